//! System entropy seed source
//!
//! The only place the crate reads ambient state. Seeds come from the
//! operating system's entropy source via `getrandom`. If that is unavailable
//! the wall clock (nanosecond resolution) mixed with a process-wide counter
//! stands in, so two generators built within the same clock tick still get
//! different seeds.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

const COUNTER_STRIDE: u64 = 0x9E3779B97F4A7C15;

/// Produce a fresh seed from operating-system entropy.
pub fn system_seed() -> i64 {
    let mut bytes = [0u8; 8];
    match getrandom::getrandom(&mut bytes) {
        Ok(()) => i64::from_le_bytes(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "OS entropy unavailable, seeding from the clock");
            clock_seed()
        }
    }
}

/// Clock-and-counter seed.
///
/// A clock set before the Unix epoch contributes zero nanoseconds; the counter
/// still keeps successive seeds distinct.
fn clock_seed() -> i64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let ticket = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    (nanos ^ ticket.wrapping_mul(COUNTER_STRIDE)) as i64
}
