use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Geometric};

use crate::options::SkipListOptions;

/// Assigns randomized levels to new nodes.
///
/// A node assigned level `L` participates in levels `0..=L`. Levels are always less than the
/// configured ceiling.
#[derive(Debug, Clone)]
pub(crate) struct LevelGenerator {
    ceiling: usize,
    rng: StdRng,
    /// Present only when a promotion probability was configured.
    distribution: Option<Geometric>,
}

impl LevelGenerator {
    /// Create a level generator from options that have already been validated.
    pub(crate) fn new(options: &SkipListOptions) -> Self {
        let rng = match options.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        // The geometric distribution counts failures before the first success so a success here
        // means "stop promoting". Validation guarantees the probability is in (0, 1).
        let distribution = options
            .probability()
            .and_then(|probability| Geometric::new(1.0 - probability).ok());

        LevelGenerator {
            ceiling: options.level_ceiling(),
            rng,
            distribution,
        }
    }

    /// The maximum number of levels a node may span.
    pub(crate) fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Generate a level in the range `[0, ceiling)`.
    pub(crate) fn generate(&mut self) -> usize {
        match self.distribution.as_ref() {
            Some(distribution) => {
                let sample = distribution.sample(&mut self.rng);
                sample.min((self.ceiling - 1) as u64) as usize
            }
            None => level_from_bits(self.rng.next_u64(), self.ceiling),
        }
    }
}

/// Derive a level from a random word.
///
/// The word is masked to its lowest `ceiling - 1` bits and the position of the lowest set bit is
/// the level, which gives `P(level >= L) = 2^-L`. A word with none of those bits set maps to
/// `ceiling - 1`.
fn level_from_bits(random: u64, ceiling: usize) -> usize {
    let masked = random & ((1_u64 << (ceiling - 1)) - 1);
    if masked == 0 {
        return ceiling - 1;
    }

    masked.trailing_zeros() as usize
}
