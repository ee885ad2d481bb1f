//! Structured logging and secret-scrubbing helpers.
//!
//! This module configures the `tracing` ecosystem for the application and
//! keeps Google API keys out of logged upstream error bodies.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::Result;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static SANITIZE: AtomicBool = AtomicBool::new(true);
static SECRET_REGEX: OnceLock<Regex> = OnceLock::new();

fn secret_regex() -> &'static Regex {
    SECRET_REGEX.get_or_init(|| {
        Regex::new(r"AIza[0-9A-Za-z_\-]{20,}|(?i:bearer)\s+[0-9A-Za-z._\-]+")
            .expect("Invalid regex pattern")
    })
}

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line output.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    SANITIZE.store(config.sanitize_secrets, Ordering::Relaxed);

    // Configure filter from environment or config file
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        "compact" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().compact())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

/// Replace API keys and bearer tokens with `[REDACTED]`.
///
/// A no-op when `logging.sanitize_secrets` is off.
pub fn sanitize(input: &str) -> String {
    if !SANITIZE.load(Ordering::Relaxed) {
        return input.to_string();
    }
    secret_regex().replace_all(input, "[REDACTED]").into_owned()
}
