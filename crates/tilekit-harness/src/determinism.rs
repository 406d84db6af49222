#![forbid(unsafe_code)]

//! Seed selection for randomized harness runs.
//!
//! Harnesses that exercise the real uniform interval provider take their
//! seed from the environment so a failing run can be replayed exactly.

/// Choose a seed from environment or use the provided default.
///
/// Checked in order: `TILEKIT_TEST_SEED`, `TILEKIT_SEED`.
#[must_use]
pub fn fixture_seed(default_seed: u64) -> u64 {
    fixture_seed_with(default_seed, |key| std::env::var(key).ok())
}

fn fixture_seed_with<F>(default_seed: u64, get: F) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    ["TILEKIT_TEST_SEED", "TILEKIT_SEED"]
        .iter()
        .find_map(|key| get(key).and_then(|v| v.trim().parse().ok()))
        .unwrap_or(default_seed)
}
