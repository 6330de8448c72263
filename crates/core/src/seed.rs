//! Seed tokens
//!
//! A seed is an opaque 13-digit number. The randomizer derives the game
//! layout from it; the bot only draws and shares it.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest seed value (inclusive)
pub const SEED_MIN: u64 = 1_000_000_000_000;

/// Upper seed bound (exclusive)
pub const SEED_MAX: u64 = 10_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Seed(u64);

impl Seed {
    /// Draw uniformly from `[SEED_MIN, SEED_MAX)`
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(rng.gen_range(SEED_MIN..SEED_MAX))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_seeds_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let seed = Seed::generate(&mut rng);
            assert!((SEED_MIN..SEED_MAX).contains(&seed.value()));
            assert_eq!(seed.to_string().len(), 13);
        }
    }

    #[test]
    fn test_seeds_vary() {
        let mut rng = rand::thread_rng();
        let first = Seed::generate(&mut rng);
        let distinct = (0..16).any(|_| Seed::generate(&mut rng) != first);
        assert!(distinct);
    }
}
