//! Logging setup for the binary.
//!
//! Events go to stderr so DDL on stdout stays clean. RUST_LOG takes
//! precedence over the configured filter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_FILTER: &str = "warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Filter used when RUST_LOG is unset
    pub default_filter: String,

    /// Whether to include file/line information in events
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Pick the filter from the command line and config file settings.
    ///
    /// `--verbose` beats the config file's `log_filter`.
    pub fn from_settings(verbose: bool, log_filter: Option<&str>) -> Self {
        let default_filter = match (verbose, log_filter) {
            (true, _) => "debug",
            (false, Some(filter)) if !filter.trim().is_empty() => filter,
            _ => DEFAULT_FILTER,
        };
        Self {
            default_filter: default_filter.to_string(),
            include_location: verbose,
        }
    }
}

/// Install the global subscriber.
///
/// An invalid filter falls back to [`DEFAULT_FILTER`]. Installing twice is a
/// no-op.
pub fn init(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.default_filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_filter(env_filter);

    if tracing_subscriber::registry().with(stderr_layer).try_init().is_ok() {
        tracing::debug!(filter = %config.default_filter, "logging initialized");
    }
}
