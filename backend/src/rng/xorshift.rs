//! xorshift64* bit source
//!
//! The engine behind [`Random`](super::Random). It owns 64 bits of state and
//! produces one 64-bit word per step.
//!
//! # Algorithm
//!
//! xorshift64* is a variant of xorshift that passes TestU01's BigCrush
//! statistical tests. The high bits of each output are the strongest, so
//! callers that need fewer than 64 bits take them from the top.
//!
//! # Seeding
//!
//! Seeds are scrambled through one SplitMix64 step before becoming state.
//! Adjacent seeds (0, 1, 2, ...) therefore start far apart, and seed 0 is
//! accepted like any other value.

use serde::{Deserialize, Serialize};

const XORSHIFT_MULTIPLIER: u64 = 0x2545F4914F6CDD1D;

/// Substituted when the scrambled seed lands on zero (xorshift requirement).
const NONZERO_FALLBACK: u64 = 0x9E3779B97F4A7C15;

/// Raw xorshift64* engine.
///
/// # Example
/// ```
/// use seeded_random_core::rng::Xorshift64Star;
///
/// let mut engine = Xorshift64Star::from_seed(12345);
/// let word = engine.next_u64();
/// assert_ne!(engine.state(), 0);
/// # let _ = word;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xorshift64Star {
    /// Internal state (64-bit, never zero)
    state: u64,
}

impl Xorshift64Star {
    /// Create an engine whose whole future is a function of `seed`.
    pub fn from_seed(seed: i64) -> Self {
        let state = splitmix64(seed as u64);
        Self {
            state: if state == 0 { NONZERO_FALLBACK } else { state },
        }
    }

    /// Advance the state and return the next 64-bit word.
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(XORSHIFT_MULTIPLIER)
    }

    /// Next 32-bit word, taken from the high half.
    pub fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Current raw state (for snapshots and diagnostics)
    pub fn state(&self) -> u64 {
        self.state
    }
}

fn splitmix64(seed: u64) -> u64 {
    let mut z = seed.wrapping_add(0x9E3779B97F4A7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_yields_nonzero_state() {
        let engine = Xorshift64Star::from_seed(0);
        assert_ne!(engine.state(), 0, "Zero seed must not produce zero state");
    }

    #[test]
    fn test_negative_seed_accepted() {
        let mut engine = Xorshift64Star::from_seed(-1);
        assert_ne!(engine.state(), 0);
        assert_ne!(engine.next_u64(), engine.next_u64());
    }

    #[test]
    fn test_adjacent_seeds_diverge() {
        let mut a = Xorshift64Star::from_seed(1);
        let mut b = Xorshift64Star::from_seed(2);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert!(xs.iter().zip(&ys).all(|(x, y)| x != y));
    }

    #[test]
    fn test_state_advances() {
        let mut engine = Xorshift64Star::from_seed(12345);
        let before = engine.state();
        engine.next_u64();
        assert_ne!(before, engine.state(), "Engine state should advance");
    }

    #[test]
    fn test_next_u32_is_high_half() {
        let mut a = Xorshift64Star::from_seed(99);
        let mut b = a.clone();
        assert_eq!(a.next_u32(), (b.next_u64() >> 32) as u32);
    }
}
