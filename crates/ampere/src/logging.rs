//! Logging initialization and configuration.
//!
//! Uses the `tracing` ecosystem for structured logging with support for
//! both human-readable and JSON output formats.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the logging subsystem.
///
/// # Arguments
///
/// * `level` - Default filter directive, e.g. "warn" or "ampere_core=debug".
/// * `json_format` - If true, outputs structured JSON logs; otherwise pretty-printed.
///
/// # Notes
///
/// - Log output always goes to stderr; stdout carries only the result object
/// - The RUST_LOG environment variable can override the log level
/// - An unparseable `level` falls back to INFO
pub fn init(level: &str, json_format: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .init();
    }
}

/// Initialize logging from the `[logging]` config section, with CLI flags
/// taking precedence.
pub fn init_from_config(
    config: &ampere_core::Config,
    verbose_override: bool,
    json_logs_override: bool,
) {
    let json_format = json_logs_override || config.logging.format.eq_ignore_ascii_case("json");
    init(&filter_level(&config.logging.level, verbose_override), json_format);
}

/// Default level for the CLI flags alone.
pub fn cli_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// `--verbose` wins; otherwise the configured level, lowercased.
fn filter_level(configured: &str, verbose: bool) -> String {
    let configured = configured.trim();
    if verbose {
        "debug".to_string()
    } else if configured.is_empty() {
        "info".to_string()
    } else {
        configured.to_lowercase()
    }
}
