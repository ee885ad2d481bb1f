//! Configuration data structures for headshot-forge.
//!
//! This module defines the schema for the application settings: the HTTP
//! server, the upstream Gemini image model, the upload/result store, input
//! limits and logging.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, body limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream Gemini API settings.
    #[serde(default)]
    pub gemini: GeminiConfig,

    /// Content store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Input image limits.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `5000`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum accepted request body, uploads included.
    /// Default: 50 MiB
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Settings for the upstream Gemini API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Base URL for the public Generative Language API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// API key sent as `x-goog-api-key`. Falls back to `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    /// Image-capable model used for every generation call.
    /// Default: `gemini-2.5-flash-image`
    #[serde(default = "default_model")]
    pub model: String,

    /// Timeout for generation calls in seconds.
    /// Default: `30`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Timeout for the connectivity probe in seconds.
    /// Default: `15`
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_seconds: u64,

    /// TCP connect timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

/// Settings for the directory that holds uploads and generated results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded inputs and generated results.
    /// Default: `uploads`
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// Whether to expose the directory read-only under `/uploads`.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub serve_files: bool,
}

/// Dimension gate applied to inputs before anything is sent upstream.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Default: `100000` (size policy is left to the provider)
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,

    /// Default: `100000`
    #[serde(default = "default_max_dimension")]
    pub max_height: u32,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Whether to mask API keys in logged upstream errors.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub sanitize_secrets: bool,
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            model: default_model(),
            timeout_seconds: default_timeout(),
            probe_timeout_seconds: default_probe_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            serve_files: true,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            sanitize_secrets: true,
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_body_limit() -> usize {
    50 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_model() -> String {
    "gemini-2.5-flash-image".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_probe_timeout() -> u64 {
    15
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_max_dimension() -> u32 {
    100_000
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
