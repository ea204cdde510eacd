//! Tracing subscriber setup.
//!
//! The library only emits `tracing` events; embedding applications either
//! install their own subscriber or call [`init_logging`] once at startup.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable that overrides `RUST_LOG` for this crate's filter.
pub const LOG_ENV: &str = "MOLSEARCH_LOG";

/// Options for [`init_logging`].
#[derive(Debug, Clone, Default)]
pub struct LoggingOptions {
    /// Default to `debug` instead of `info` when no filter is set in the environment.
    pub debug: bool,
    /// Emit newline-delimited JSON instead of compact text.
    pub json: bool,
}

/// Build the filter: `MOLSEARCH_LOG`, then `RUST_LOG`, then the default level.
fn build_filter(options: &LoggingOptions) -> EnvFilter {
    let default_level = if options.debug { "debug" } else { "info" };
    std::env::var(LOG_ENV)
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level))
}

/// Install a global subscriber.
///
/// Returns `false` if a global subscriber was already set; the existing one
/// is left untouched.
pub fn init_logging(options: LoggingOptions) -> bool {
    let filter = build_filter(&options);
    let registry = tracing_subscriber::registry().with(filter);

    let result = if options.json {
        registry
            .with(fmt::layer().json().with_target(true))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).compact())
            .try_init()
    };

    result.is_ok()
}
