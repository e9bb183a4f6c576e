//! Structured Logging Configuration
//!
//! Provides configurable logging with:
//! - JSON output for log aggregation (LOG_FORMAT=json)
//! - Human-readable output for interactive use (default)
//!
//! All output goes to stderr so that console tables printed on stdout
//! stay machine-readable.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ca_common::logging::init_logging;
//!
//! fn main() {
//!     init_logging("ca-admin", "warn");
//!
//!     tracing::info!(player_id = %id, "Player status changed");
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `LOG_FORMAT`: Set to "json" for JSON output, anything else for text (default: text)
//! - `RUST_LOG`: Standard log level filter, overrides the default directive
//!   Examples: `RUST_LOG=debug`, `RUST_LOG=ca_console=trace,reqwest=info`

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize logging for the given service.
///
/// Reads LOG_FORMAT env var to determine output format:
/// - "json" -> JSON output
/// - anything else -> human-readable text
///
/// Reads RUST_LOG for level filtering, falling back to `default_directive`.
pub fn init_logging(service_name: &str, default_directive: &str) {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    let env_filter = build_filter(default_directive);

    if log_format.eq_ignore_ascii_case("json") {
        init_json_logging(env_filter);
    } else {
        init_text_logging(env_filter);
    }

    tracing::debug!(service = service_name, "Logging initialized");
}

fn build_filter(default_directive: &str) -> EnvFilter {
    filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref(), default_directive)
}

/// An unset, empty or unparsable `RUST_LOG` falls back to `default_directive`
fn filter_from(rust_log: Option<&str>, default_directive: &str) -> EnvFilter {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directive))
}

fn init_json_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_file(true)
                .with_line_number(true)
                .with_target(true)
                .flatten_event(true),
        )
        .init();
}

fn init_text_logging(env_filter: EnvFilter) {
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true),
        )
        .init();
}
