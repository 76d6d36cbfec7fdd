//! Seedable random value generator
//!
//! [`Random`] owns one engine and hands out values of several shapes. Every
//! query mutates the engine, so two calls are consecutive steps over one
//! evolving state, never independent draws.
//!
//! # Determinism
//!
//! Same seed + same sequence of calls → same outputs, on every run and every
//! instance. [`Random::set_seed`] is a total reset: nothing drawn before it
//! (including a cached Gaussian spare) leaks into what is drawn after it.
//!
//! Fresh entropy is opt-in and always named as such
//! ([`Random::from_entropy`], [`Random::reseed_from_entropy`],
//! [`Random::next_bytes_fresh`]).

use super::entropy::system_seed;
use super::xorshift::Xorshift64Star;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// Precondition violations at the generator boundary
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RandomError {
    #[error("Upper bound must be at least 1, got {n}")]
    NonPositiveBound { n: i32 },

    #[error("Inverted range: low {low} is greater than high {high}")]
    InvertedRange { low: i32, high: i32 },
}

/// Seedable pseudo-random value generator.
///
/// Not cryptographically secure. Not meant to be shared between threads; give
/// each use-site its own instance.
///
/// # Example
/// ```
/// use seeded_random_core::Random;
///
/// let mut rng = Random::new(5);
/// let first: Vec<i32> = (0..10).map(|_| rng.next_int()).collect();
///
/// rng.set_seed(5);
/// let again: Vec<i32> = (0..10).map(|_| rng.next_int()).collect();
/// assert_eq!(first, again);
///
/// let die = rng.next_int_between(1, 6).unwrap();
/// assert!((1..=6).contains(&die));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Random {
    /// Seed of the most recent (re)seeding
    seed: i64,

    engine: Xorshift64Star,

    /// Second Box-Muller variate, served by the next `next_gaussian` call
    spare_gaussian: Option<f64>,
}

impl Random {
    /// Create a generator with an explicit seed.
    pub fn new(seed: i64) -> Self {
        Self {
            seed,
            engine: Xorshift64Star::from_seed(seed),
            spare_gaussian: None,
        }
    }

    /// Create a generator seeded from system entropy.
    ///
    /// The seed actually used is available from [`Random::seed`], so a run
    /// can be replayed with [`Random::new`].
    pub fn from_entropy() -> Self {
        Self::new(system_seed())
    }

    /// Seed of the most recent (re)seeding
    pub fn seed(&self) -> i64 {
        self.seed
    }

    /// Reset the generator so subsequent draws depend on `seed` alone.
    pub fn set_seed(&mut self, seed: i64) {
        self.seed = seed;
        self.engine = Xorshift64Star::from_seed(seed);
        self.spare_gaussian = None;
    }

    /// Reseed from system entropy and return the seed used.
    pub fn reseed_from_entropy(&mut self) -> i64 {
        let seed = system_seed();
        self.set_seed(seed);
        seed
    }

    /// Fair coin flip.
    pub fn next_boolean(&mut self) -> bool {
        self.engine.next_u64() >> 63 == 1
    }

    /// Fill `bytes` with values drawn uniformly from `0..=255`.
    ///
    /// Draws from the seeded engine like every other operation, so the
    /// contents are reproducible after [`Random::set_seed`].
    pub fn next_bytes(&mut self, bytes: &mut [u8]) {
        for chunk in bytes.chunks_mut(8) {
            let word = self.engine.next_u64().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    /// Reseed from system entropy, then fill `bytes`.
    ///
    /// Breaks continuity with any earlier explicit seed on purpose.
    pub fn next_bytes_fresh(&mut self, bytes: &mut [u8]) {
        self.reseed_from_entropy();
        self.next_bytes(bytes);
    }

    /// Uniform `f64` in [0.0, 1.0), 53 bits of resolution.
    pub fn next_double(&mut self) -> f64 {
        (self.engine.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform `f32` in [0.0, 1.0), 24 bits of resolution.
    pub fn next_float(&mut self) -> f32 {
        (self.engine.next_u64() >> 40) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Standard normal sample (mean 0, standard deviation 1).
    ///
    /// Box-Muller produces variates in pairs; the second one is cached and
    /// returned by the next call.
    pub fn next_gaussian(&mut self) -> f64 {
        if let Some(spare) = self.spare_gaussian.take() {
            return spare;
        }

        // u1 in (0, 1] keeps ln() finite
        let u1 = 1.0 - self.next_double();
        let u2 = self.next_double();
        let radius = (-2.0 * u1.ln()).sqrt();
        let theta = 2.0 * PI * u2;

        self.spare_gaussian = Some(radius * theta.sin());
        radius * theta.cos()
    }

    /// Any `i32`, uniformly.
    pub fn next_int(&mut self) -> i32 {
        self.engine.next_u32() as i32
    }

    /// Uniform integer in [0, n).
    ///
    /// # Errors
    /// [`RandomError::NonPositiveBound`] if `n < 1`. The engine is not
    /// advanced when the call is rejected.
    pub fn next_int_below(&mut self, n: i32) -> Result<i32, RandomError> {
        if n < 1 {
            return Err(RandomError::NonPositiveBound { n });
        }
        Ok(self.bounded(n as u64) as i32)
    }

    /// Uniform integer in [low, high], both ends inclusive.
    ///
    /// # Errors
    /// [`RandomError::InvertedRange`] if `low > high`. The engine is not
    /// advanced when the call is rejected.
    pub fn next_int_between(&mut self, low: i32, high: i32) -> Result<i32, RandomError> {
        if low > high {
            return Err(RandomError::InvertedRange { low, high });
        }
        // At most 2^32 values, always fits in u64
        let span = (i64::from(high) - i64::from(low) + 1) as u64;
        Ok((i64::from(low) + self.bounded(span) as i64) as i32)
    }

    /// Any `i64`, uniformly.
    pub fn next_long(&mut self) -> i64 {
        self.engine.next_u64() as i64
    }

    /// Unbiased draw from [0, span) by widening multiply with rejection.
    fn bounded(&mut self, span: u64) -> u64 {
        debug_assert!(span > 0);
        // 2^64 mod span: low products below this fall in the biased zone
        let threshold = span.wrapping_neg() % span;
        loop {
            let product = u128::from(self.engine.next_u64()) * u128::from(span);
            if product as u64 >= threshold {
                return (product >> 64) as u64;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_records_seed() {
        let rng = Random::new(-42);
        assert_eq!(rng.seed(), -42);
    }

    #[test]
    fn test_set_seed_clears_gaussian_spare() {
        let mut a = Random::new(7);
        let expected = a.next_gaussian();

        let mut b = Random::new(7);
        b.next_gaussian(); // leaves a spare behind
        b.set_seed(7);
        assert_eq!(b.next_gaussian(), expected, "spare leaked across set_seed");
    }

    #[test]
    fn test_gaussian_pairs_use_one_engine_step_pair() {
        let mut a = Random::new(11);
        let mut b = Random::new(11);
        a.next_gaussian();
        a.next_gaussian();
        b.next_double();
        b.next_double();
        assert_eq!(a.next_long(), b.next_long());
    }

    #[test]
    fn test_next_bytes_partial_chunk() {
        let mut a = Random::new(3);
        let mut b = Random::new(3);

        let mut short = [0u8; 5];
        a.next_bytes(&mut short);
        let word = b.next_long().to_le_bytes();
        assert_eq!(short, word[..5]);
    }

    #[test]
    fn test_next_bytes_empty_does_not_advance() {
        let mut a = Random::new(3);
        let mut b = Random::new(3);
        a.next_bytes(&mut []);
        assert_eq!(a.next_long(), b.next_long());
    }

    #[test]
    fn test_next_bytes_fresh_reseeds_then_fills() {
        let mut rng = Random::new(3);
        let mut buf = [0u8; 16];
        rng.next_bytes_fresh(&mut buf);
        let seed = rng.seed();
        assert_ne!(seed, 3);

        let mut replay = Random::new(seed);
        let mut expected = [0u8; 16];
        replay.next_bytes(&mut expected);
        assert_eq!(buf, expected);
    }

    #[test]
    fn test_reseed_from_entropy_is_replayable() {
        let mut rng = Random::new(1);
        let seed = rng.reseed_from_entropy();
        let drawn: Vec<i64> = (0..5).map(|_| rng.next_long()).collect();

        let mut replay = Random::new(seed);
        let replayed: Vec<i64> = (0..5).map(|_| replay.next_long()).collect();
        assert_eq!(drawn, replayed);
    }

    #[test]
    fn test_rejected_bound_leaves_state_untouched() {
        let mut a = Random::new(21);
        let mut b = Random::new(21);

        assert_eq!(
            a.next_int_below(0),
            Err(RandomError::NonPositiveBound { n: 0 })
        );
        assert_eq!(
            a.next_int_between(5, 4),
            Err(RandomError::InvertedRange { low: 5, high: 4 })
        );
        assert_eq!(a.next_int(), b.next_int());
    }

    #[test]
    fn test_single_value_ranges() {
        let mut rng = Random::new(8);
        for _ in 0..100 {
            assert_eq!(rng.next_int_below(1), Ok(0));
            assert_eq!(rng.next_int_between(-3, -3), Ok(-3));
        }
    }

    #[test]
    fn test_full_i32_range_accepted() {
        let mut rng = Random::new(8);
        for _ in 0..1000 {
            assert!(rng.next_int_between(i32::MIN, i32::MAX).is_ok());
        }
        let top = rng.next_int_below(i32::MAX).unwrap();
        assert!((0..i32::MAX).contains(&top));
    }

    #[test]
    fn test_next_float_in_range() {
        let mut rng = Random::new(12345);
        for _ in 0..10_000 {
            let v = rng.next_float();
            assert!((0.0..1.0).contains(&v), "next_float() = {} out of [0, 1)", v);
        }
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            RandomError::NonPositiveBound { n: -2 }.to_string(),
            "Upper bound must be at least 1, got -2"
        );
        assert_eq!(
            RandomError::InvertedRange { low: 9, high: 1 }.to_string(),
            "Inverted range: low 9 is greater than high 1"
        );
    }
}
