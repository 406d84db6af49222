#![forbid(unsafe_code)]

//! LiveTile configuration: environment overrides, validation and, behind
//! the `policy-config` feature, TOML files.
//!
//! Environment variables:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `TILEKIT_TILE_DIRECTION` | `up`, `left` | `up` |
//! | `TILEKIT_TILE_MIN_INTERVAL_MS` | integer ms | `5000` |
//! | `TILEKIT_TILE_MAX_INTERVAL_MS` | integer ms | `10000` |
//! | `TILEKIT_TILE_TRANSITION_MS` | integer ms | `500` |
//! | `TILEKIT_TILE_EASING` | `linear`, `ease-in`, `ease-out`, `ease-in-out` | `ease-out` |
//!
//! A malformed value is reported in [`ConfigParse::errors`] and the default
//! for that field is kept.

use std::env;
use std::fmt;
use std::time::Duration;

use tilekit_core::Direction;
use tilekit_runtime::interval::{DEFAULT_MAX_INTERVAL, DEFAULT_MIN_INTERVAL};
use tilekit_runtime::{Easing, UniformInterval};

pub const ENV_TILE_DIRECTION: &str = "TILEKIT_TILE_DIRECTION";
pub const ENV_TILE_MIN_INTERVAL_MS: &str = "TILEKIT_TILE_MIN_INTERVAL_MS";
pub const ENV_TILE_MAX_INTERVAL_MS: &str = "TILEKIT_TILE_MAX_INTERVAL_MS";
pub const ENV_TILE_TRANSITION_MS: &str = "TILEKIT_TILE_TRANSITION_MS";
pub const ENV_TILE_EASING: &str = "TILEKIT_TILE_EASING";

/// Default slide duration.
pub const DEFAULT_TRANSITION: Duration = Duration::from_millis(500);

/// Tunables of one LiveTile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveTileConfig {
    /// Initial slide direction.
    pub direction: Direction,
    /// Lower bound of the random tick delay (inclusive).
    pub min_interval: Duration,
    /// Upper bound of the random tick delay (exclusive).
    pub max_interval: Duration,
    /// Slide duration.
    pub transition: Duration,
    /// Slide easing curve.
    pub easing: Easing,
}

impl Default for LiveTileConfig {
    fn default() -> Self {
        Self {
            direction: Direction::Up,
            min_interval: DEFAULT_MIN_INTERVAL,
            max_interval: DEFAULT_MAX_INTERVAL,
            transition: DEFAULT_TRANSITION,
            easing: Easing::EaseOut,
        }
    }
}

/// Parse result with diagnostics.
#[derive(Debug, Clone)]
pub struct ConfigParse {
    pub config: LiveTileConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}: {}", self.field, self.value, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl LiveTileConfig {
    /// Parse config from environment variables, dropping diagnostics.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> ConfigParse {
        from_env_with(|key| env::var(key).ok())
    }

    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn with_intervals(mut self, min: Duration, max: Duration) -> Self {
        self.min_interval = min;
        self.max_interval = max;
        self
    }

    #[must_use]
    pub fn with_transition(mut self, transition: Duration) -> Self {
        self.transition = transition;
        self
    }

    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        validate_nonzero("min_interval", self.min_interval, &mut errors);
        validate_nonzero("max_interval", self.max_interval, &mut errors);
        validate_nonzero("transition", self.transition, &mut errors);
        if self.max_interval <= self.min_interval {
            errors.push(ConfigError::new(
                "max_interval",
                millis(self.max_interval),
                format!("must be > min_interval ({}ms)", self.min_interval.as_millis()),
            ));
        }
        if self.min_interval <= self.transition {
            errors.push(ConfigError::new(
                "min_interval",
                millis(self.min_interval),
                format!("must be > transition ({}ms)", self.transition.as_millis()),
            ));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Interval provider drawing uniformly from `[min_interval, max_interval)`.
    #[must_use]
    pub fn interval_provider(&self) -> UniformInterval {
        UniformInterval::new(self.min_interval, self.max_interval)
    }

    /// Parse a TOML document and validate it.
    ///
    /// Keys: `direction`, `min_interval_ms`, `max_interval_ms`,
    /// `transition_ms`, `easing`. Missing keys keep their defaults.
    #[cfg(feature = "policy-config")]
    pub fn from_toml_str(source: &str) -> Result<Self, Vec<ConfigError>> {
        let raw: policy::RawConfig = toml::from_str(source)
            .map_err(|err| vec![ConfigError::new("toml", "", err.to_string())])?;
        let parsed = raw.into_config();
        if !parsed.errors.is_empty() {
            return Err(parsed.errors);
        }
        parsed.config.validate()?;
        Ok(parsed.config)
    }
}

fn from_env_with<F>(mut get: F) -> ConfigParse
where
    F: FnMut(&str) -> Option<String>,
{
    let mut config = LiveTileConfig::default();
    let mut errors = Vec::new();

    if let Some(value) = get(ENV_TILE_DIRECTION) {
        apply_direction(&mut config, &value, &mut errors);
    }
    if let Some(value) = get(ENV_TILE_MIN_INTERVAL_MS) {
        apply_millis("min_interval", &value, &mut config.min_interval, &mut errors);
    }
    if let Some(value) = get(ENV_TILE_MAX_INTERVAL_MS) {
        apply_millis("max_interval", &value, &mut config.max_interval, &mut errors);
    }
    if let Some(value) = get(ENV_TILE_TRANSITION_MS) {
        apply_millis("transition", &value, &mut config.transition, &mut errors);
    }
    if let Some(value) = get(ENV_TILE_EASING) {
        apply_easing(&mut config, &value, &mut errors);
    }

    ConfigParse { config, errors }
}

fn apply_direction(config: &mut LiveTileConfig, value: &str, errors: &mut Vec<ConfigError>) {
    match Direction::parse(value) {
        Some(direction) => config.direction = direction,
        None => errors.push(ConfigError::new("direction", value, "expected up|left")),
    }
}

fn apply_easing(config: &mut LiveTileConfig, value: &str, errors: &mut Vec<ConfigError>) {
    match Easing::parse(value) {
        Some(easing) => config.easing = easing,
        None => errors.push(ConfigError::new(
            "easing",
            value,
            "expected linear|ease-in|ease-out|ease-in-out",
        )),
    }
}

fn apply_millis(
    field: &'static str,
    value: &str,
    slot: &mut Duration,
    errors: &mut Vec<ConfigError>,
) {
    match parse_millis(value) {
        Some(duration) => *slot = duration,
        None => errors.push(ConfigError::new(field, value, "expected milliseconds")),
    }
}

#[inline]
fn parse_millis(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_millis)
}

fn millis(duration: Duration) -> String {
    format!("{}ms", duration.as_millis())
}

fn validate_nonzero(field: &'static str, value: Duration, errors: &mut Vec<ConfigError>) {
    if value.is_zero() {
        errors.push(ConfigError::new(field, millis(value), "must be > 0"));
    }
}

#[cfg(feature = "policy-config")]
mod policy {
    use std::time::Duration;

    use serde::Deserialize;

    use super::{ConfigParse, LiveTileConfig, apply_direction, apply_easing};

    #[derive(Debug, Default, Deserialize)]
    #[serde(default, deny_unknown_fields)]
    pub(super) struct RawConfig {
        direction: Option<String>,
        min_interval_ms: Option<u64>,
        max_interval_ms: Option<u64>,
        transition_ms: Option<u64>,
        easing: Option<String>,
    }

    impl RawConfig {
        pub(super) fn into_config(self) -> ConfigParse {
            let mut config = LiveTileConfig::default();
            let mut errors = Vec::new();
            if let Some(value) = self.direction {
                apply_direction(&mut config, &value, &mut errors);
            }
            if let Some(ms) = self.min_interval_ms {
                config.min_interval = Duration::from_millis(ms);
            }
            if let Some(ms) = self.max_interval_ms {
                config.max_interval = Duration::from_millis(ms);
            }
            if let Some(ms) = self.transition_ms {
                config.transition = Duration::from_millis(ms);
            }
            if let Some(value) = self.easing {
                apply_easing(&mut config, &value, &mut errors);
            }
            ConfigParse { config, errors }
        }
    }
}
