//! Debug tracing infrastructure for development diagnostics
//!
//! Provides structured logging for debugging marker lifecycle, suggestion
//! assembly, and insertion reconciliation issues. Collaborator failures are
//! logged here and never propagate across the suggestion-request boundary.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=zencomplete::marker=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/zencomplete/logs/zencomplete.log` with
//! daily rotation. File logging uses debug level by default for more
//! verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG env var for filtering:
/// - `RUST_LOG=debug` - all debug logs
/// - `RUST_LOG=zencomplete::autocomplete=debug` - module-level filtering
///
/// File logging writes to `~/.config/zencomplete/logs/zencomplete.log` with
/// daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "zencomplete.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}
