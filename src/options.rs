use crate::error::Error;

/// The default tolerance under which two keys are considered equal.
pub const DEFAULT_EPS: f64 = 1e-8;

/// The default maximum number of levels a node may span.
pub const DEFAULT_LEVEL_CEILING: usize = 25;

/// The largest supported level ceiling. Levels are derived from the bits of a random `u64`.
pub const MAX_LEVEL_CEILING: usize = 64;

/// Configuration for a [`SkipList`](crate::SkipList).
///
/// # Examples
/// ```
/// use nerdondon_leapfrog::{SkipList, SkipListOptions};
///
/// let options = SkipListOptions::new()
///     .with_eps(0.001)
///     .with_level_ceiling(16)
///     .with_seed(0x6261746d616e6e);
/// let skiplist = SkipList::<f64>::with_options(options).unwrap();
/// assert!(skiplist.is_empty());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkipListOptions {
    /// Keys closer together than this are treated as equal.
    eps: f64,
    /// The maximum number of levels a single node may span.
    level_ceiling: usize,
    /// Seed for the random source used to assign levels. Seeded from entropy when `None`.
    seed: Option<u64>,
    /// The chance that a node present at one level is also present at the next level up. When
    /// `None`, levels are derived from the trailing zeros of a random word which gives a chance
    /// of one half.
    probability: Option<f64>,
}

impl Default for SkipListOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SkipListOptions {
    /// Create a set of options with the default values.
    pub const fn new() -> Self {
        SkipListOptions {
            eps: DEFAULT_EPS,
            level_ceiling: DEFAULT_LEVEL_CEILING,
            seed: None,
            probability: None,
        }
    }

    /// Set the tolerance used when comparing keys for equality.
    pub const fn with_eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    /// Set the maximum number of levels a node may span.
    pub const fn with_level_ceiling(mut self, level_ceiling: usize) -> Self {
        self.level_ceiling = level_ceiling;
        self
    }

    /// Seed the random source so that level assignment is reproducible.
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a geometric distribution with the given promotion probability to assign levels.
    pub const fn with_probability(mut self, probability: f64) -> Self {
        self.probability = Some(probability);
        self
    }

    /// The tolerance under which two keys are considered equal.
    pub const fn eps(&self) -> f64 {
        self.eps
    }

    /// The maximum number of levels a node may span.
    pub const fn level_ceiling(&self) -> usize {
        self.level_ceiling
    }

    /// The seed for the level random source, if one was configured.
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// The promotion probability, if a geometric level distribution was configured.
    pub const fn probability(&self) -> Option<f64> {
        self.probability
    }

    /// Check that the options describe a usable skip list.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.eps.is_finite() || self.eps < 0.0 {
            return Err(Error::InvalidEps(self.eps));
        }

        if self.level_ceiling == 0 || self.level_ceiling > MAX_LEVEL_CEILING {
            return Err(Error::InvalidLevelCeiling(self.level_ceiling));
        }

        if let Some(probability) = self.probability {
            // Written so that NaN is rejected as well
            if !(probability > 0.0 && probability < 1.0) {
                return Err(Error::InvalidProbability(probability));
            }
        }

        Ok(())
    }
}
