/// Errors returned when a [`SkipList`](crate::SkipList) is constructed with invalid options.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    /// The key equality tolerance was negative, infinite or NaN.
    #[error("eps must be a finite, non-negative number but was {0}")]
    InvalidEps(f64),

    /// The level ceiling was zero or wider than the random word used to generate levels.
    #[error("level ceiling must be between 1 and 64 but was {0}")]
    InvalidLevelCeiling(usize),

    /// The promotion probability was outside of the open interval (0, 1).
    #[error("probability must be strictly between 0 and 1 but was {0}")]
    InvalidProbability(f64),
}
