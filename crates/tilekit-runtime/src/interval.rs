#![forbid(unsafe_code)]

//! Injectable delay sources for recurring timers.
//!
//! A recurring timer asks its [`IntervalProvider`] for a fresh delay every
//! time it re-arms. Production controls use [`UniformInterval`], which draws
//! independently from `[min, max)` with no persisted seed; tests swap in
//! [`FixedInterval`] or [`ScriptedIntervals`] to make time deterministic.

use std::fmt;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default lower bound of the rotation delay.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);
/// Default (exclusive) upper bound of the rotation delay.
pub const DEFAULT_MAX_INTERVAL: Duration = Duration::from_secs(10);

/// Source of delays between consecutive timer firings.
pub trait IntervalProvider {
    /// Delay before the next firing.
    fn next_interval(&mut self) -> Duration;
}

// ---------------------------------------------------------------------------
// UniformInterval
// ---------------------------------------------------------------------------

/// Uniformly distributed delays in `[min, max)`.
///
/// Each draw is independent of the previous one. A degenerate range
/// (`max <= min`) always yields `min`.
pub struct UniformInterval {
    min: Duration,
    max: Duration,
    rng: StdRng,
}

impl UniformInterval {
    /// Draw from `[min, max)` using an entropy-seeded generator.
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self {
            min,
            max,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Draw from `[min, max)` with a fixed seed (reproducible sequence).
    #[must_use]
    pub fn seeded(min: Duration, max: Duration, seed: u64) -> Self {
        Self {
            min,
            max,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn min(&self) -> Duration {
        self.min
    }

    /// Upper bound (exclusive).
    #[must_use]
    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for UniformInterval {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL)
    }
}

impl IntervalProvider for UniformInterval {
    fn next_interval(&mut self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let lo = saturating_nanos(self.min);
        let hi = saturating_nanos(self.max);
        if hi <= lo {
            return self.min;
        }
        Duration::from_nanos(self.rng.random_range(lo..hi))
    }
}

impl fmt::Debug for UniformInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UniformInterval")
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

// ---------------------------------------------------------------------------
// FixedInterval
// ---------------------------------------------------------------------------

/// The same delay every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl IntervalProvider for FixedInterval {
    fn next_interval(&mut self) -> Duration {
        self.0
    }
}

// ---------------------------------------------------------------------------
// ScriptedIntervals
// ---------------------------------------------------------------------------

/// A fixed list of delays, replayed cyclically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedIntervals {
    script: Vec<Duration>,
    cursor: usize,
    drawn: u64,
}

impl ScriptedIntervals {
    /// Replay `script` in order, wrapping at the end.
    ///
    /// # Panics
    ///
    /// Panics if `script` is empty.
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = Duration>) -> Self {
        let script: Vec<Duration> = script.into_iter().collect();
        assert!(
            !script.is_empty(),
            "ScriptedIntervals requires at least one delay"
        );
        Self {
            script,
            cursor: 0,
            drawn: 0,
        }
    }

    /// Convenience constructor from whole seconds.
    #[must_use]
    pub fn from_secs(script: &[u64]) -> Self {
        Self::new(script.iter().copied().map(Duration::from_secs))
    }

    /// Number of delays handed out so far.
    #[must_use]
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

impl IntervalProvider for ScriptedIntervals {
    fn next_interval(&mut self) -> Duration {
        let delay = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        self.drawn += 1;
        delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uniform_default_bounds() {
        let provider = UniformInterval::default();
        assert_eq!(provider.min(), Duration::from_secs(5));
        assert_eq!(provider.max(), Duration::from_secs(10));
    }

    #[test]
    fn uniform_draws_stay_in_half_open_range() {
        let mut provider = UniformInterval::default();
        for _ in 0..1_000 {
            let d = provider.next_interval();
            assert!(d >= DEFAULT_MIN_INTERVAL, "{d:?} below min");
            assert!(d < DEFAULT_MAX_INTERVAL, "{d:?} not below max");
        }
    }

    #[test]
    fn uniform_seeded_is_reproducible() {
        let mut a = UniformInterval::seeded(DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL, 7);
        let mut b = UniformInterval::seeded(DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL, 7);
        let xs: Vec<_> = (0..16).map(|_| a.next_interval()).collect();
        let ys: Vec<_> = (0..16).map(|_| b.next_interval()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn uniform_draws_vary() {
        let mut provider =
            UniformInterval::seeded(DEFAULT_MIN_INTERVAL, DEFAULT_MAX_INTERVAL, 42);
        let first = provider.next_interval();
        assert!(
            (0..32).any(|_| provider.next_interval() != first),
            "independent draws should not all coincide"
        );
    }

    #[test]
    fn uniform_degenerate_range_yields_min() {
        let mut provider = UniformInterval::new(Duration::from_secs(3), Duration::from_secs(3));
        assert_eq!(provider.next_interval(), Duration::from_secs(3));
        let mut inverted = UniformInterval::new(Duration::from_secs(4), Duration::from_secs(1));
        assert_eq!(inverted.next_interval(), Duration::from_secs(4));
    }

    #[test]
    fn fixed_interval_repeats() {
        let mut provider = FixedInterval(Duration::from_millis(250));
        assert_eq!(provider.next_interval(), Duration::from_millis(250));
        assert_eq!(provider.next_interval(), Duration::from_millis(250));
    }

    #[test]
    fn scripted_intervals_cycle() {
        let mut provider = ScriptedIntervals::from_secs(&[5, 7]);
        assert_eq!(provider.next_interval(), Duration::from_secs(5));
        assert_eq!(provider.next_interval(), Duration::from_secs(7));
        assert_eq!(provider.next_interval(), Duration::from_secs(5));
        assert_eq!(provider.drawn(), 3);
    }

    #[test]
    #[should_panic(expected = "at least one delay")]
    fn scripted_intervals_reject_empty() {
        let _ = ScriptedIntervals::new(Vec::new());
    }

    proptest! {
        #[test]
        fn uniform_respects_arbitrary_bounds(
            min_ms in 1u64..5_000,
            span_ms in 1u64..5_000,
            seed in any::<u64>(),
        ) {
            let min = Duration::from_millis(min_ms);
            let max = min + Duration::from_millis(span_ms);
            let mut provider = UniformInterval::seeded(min, max, seed);
            for _ in 0..32 {
                let d = provider.next_interval();
                prop_assert!(d >= min && d < max);
            }
        }
    }
}
