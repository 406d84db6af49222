#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! TileKit logs through [`tracing`]. With the `tracing` feature this module
//! re-exports the macros the other crates use; with `tracing-json` it also
//! installs a JSON subscriber for production hosts:
//!
//! ```ignore
//! tilekit_core::logging::init_json_logging("tilekit=debug")?;
//! ```
//!
//! Without either feature the module is empty and logging compiles away.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, info, trace, warn};

/// Errors from installing the global log subscriber.
#[cfg(feature = "tracing-json")]
#[derive(Debug, Clone)]
pub enum LoggingError {
    /// The filter directive did not parse.
    InvalidFilter(String),
    /// A global subscriber was already installed.
    AlreadyInstalled(String),
}

#[cfg(feature = "tracing-json")]
impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFilter(msg) => write!(f, "invalid log filter: {msg}"),
            Self::AlreadyInstalled(msg) => write!(f, "log subscriber already installed: {msg}"),
        }
    }
}

#[cfg(feature = "tracing-json")]
impl std::error::Error for LoggingError {}

/// Install a global JSON-formatting subscriber filtered by `filter`.
///
/// `RUST_LOG`, when set, takes precedence over `filter`.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(filter: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directives) => EnvFilter::try_new(directives),
        Err(_) => EnvFilter::try_new(filter),
    }
    .map_err(|err| LoggingError::InvalidFilter(err.to_string()))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter)
        .with_current_span(true)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInstalled(err.to_string()))
}
