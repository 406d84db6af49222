#![forbid(unsafe_code)]

//! Property animation descriptions.
//!
//! A [`PropertyAnimation`] is plain data: where a scalar property starts,
//! where it ends, how long the trip takes and which [`Easing`] curve shapes
//! it. Running it is the host's job (see [`crate::host::AnimationHost`]);
//! the description only knows how to interpolate.

use std::time::Duration;

/// Easing curve applied to normalized progress.
///
/// All curves are quadratic and map `0.0 → 0.0` and `1.0 → 1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Easing {
    Linear,
    EaseIn,
    /// Fast start, gentle stop.
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the curve to `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
        }
    }

    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }

    /// Parse a curve name (`linear`, `ease-in`, `ease-out`, `ease-in-out`).
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "linear" => Some(Self::Linear),
            "ease-in" => Some(Self::EaseIn),
            "ease-out" => Some(Self::EaseOut),
            "ease-in-out" => Some(Self::EaseInOut),
            _ => None,
        }
    }
}

/// What the property holds once the animation has run its course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillBehavior {
    /// Keep the final value until someone else writes the property.
    #[default]
    HoldEnd,
    /// Snap back to the starting value.
    Stop,
}

/// A scalar property animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropertyAnimation {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
    pub fill: FillBehavior,
}

impl PropertyAnimation {
    /// Animate from `from` to `to` over `duration` with [`Easing::EaseOut`]
    /// and [`FillBehavior::HoldEnd`].
    #[must_use]
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            duration,
            easing: Easing::default(),
            fill: FillBehavior::default(),
        }
    }

    /// Set the easing curve.
    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Set the fill behavior.
    #[must_use]
    pub fn fill(mut self, fill: FillBehavior) -> Self {
        self.fill = fill;
        self
    }

    /// Interpolated value at normalized `progress` in `[0, 1]`.
    #[must_use]
    pub fn value_at(&self, progress: f64) -> f64 {
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    /// Interpolated value after `elapsed` time.
    ///
    /// A zero-length animation is complete immediately.
    #[must_use]
    pub fn value_after(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.final_value();
        }
        self.value_at(elapsed.as_secs_f64() / self.duration.as_secs_f64())
    }

    /// Value the property holds after completion, honoring [`FillBehavior`].
    #[must_use]
    pub fn final_value(&self) -> f64 {
        match self.fill {
            FillBehavior::HoldEnd => self.to,
            FillBehavior::Stop => self.from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert!((easing.apply(0.0)).abs() < EPS, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing:?} at 1");
        }
    }

    #[test]
    fn ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.25) > Easing::Linear.apply(0.25));
        assert!((Easing::EaseOut.apply(0.5) - 0.75).abs() < EPS);
    }

    #[test]
    fn easing_clamps_input() {
        assert_eq!(Easing::Linear.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(2.0), 1.0);
    }

    #[test]
    fn easing_parse_round_trips() {
        for easing in [
            Easing::Linear,
            Easing::EaseIn,
            Easing::EaseOut,
            Easing::EaseInOut,
        ] {
            assert_eq!(Easing::parse(easing.as_str()), Some(easing));
        }
        assert_eq!(Easing::parse("EASE_OUT"), Some(Easing::EaseOut));
        assert_eq!(Easing::parse("bounce"), None);
    }

    #[test]
    fn value_after_interpolates_and_holds() {
        let anim = PropertyAnimation::new(0.0, -100.0, Duration::from_millis(500))
            .easing(Easing::Linear);
        assert_eq!(anim.value_after(Duration::ZERO), 0.0);
        assert!((anim.value_after(Duration::from_millis(250)) + 50.0).abs() < EPS);
        assert_eq!(anim.value_after(Duration::from_millis(500)), -100.0);
        assert_eq!(anim.value_after(Duration::from_secs(9)), -100.0);
    }

    #[test]
    fn fill_stop_returns_to_start() {
        let anim = PropertyAnimation::new(0.0, -100.0, Duration::from_millis(500))
            .fill(FillBehavior::Stop);
        assert_eq!(anim.final_value(), 0.0);
    }

    #[test]
    fn zero_duration_completes_immediately() {
        let anim = PropertyAnimation::new(0.0, -40.0, Duration::ZERO);
        assert_eq!(anim.value_after(Duration::ZERO), -40.0);
    }
}
