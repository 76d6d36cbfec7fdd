//! Seedable random value generation
//!
//! Uses the xorshift64* algorithm as the bit source.
//! CRITICAL: explicit seeds must fully determine every output sequence.

pub mod entropy;
mod random;
mod xorshift;

pub use random::{Random, RandomError};
pub use xorshift::Xorshift64Star;
