// Gemini API client
// Author: kelexine (https://github.com/kelexine)

use super::{ModelReply, ModelTransport, ProbeReport};
use crate::config::GeminiConfig;
use crate::error::{HeadshotError, Result};
use crate::models::gemini::{Content, GenerateContentRequest, Part};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

/// Client for the public Gemini `generateContent` endpoint.
///
/// Every call is a single attempt bounded by a timeout. Retrying is a
/// content-level decision made by the identity guard, never here.
pub struct GeminiClient {
    http_client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Build a client with pooled connections and the configured timeouts.
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.connect_timeout_seconds))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| HeadshotError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn post(
        &self,
        body: &GenerateContentRequest,
        timeout: Duration,
    ) -> Result<(StatusCode, ModelReply)> {
        let url = self.endpoint();
        let start = Instant::now();

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(body)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| {
                crate::metrics::record_model_call("network_error", start.elapsed().as_secs_f64());
                request_error(e)
            })?;

        let status = response.status();
        let response_text = response.text().await;
        crate::metrics::record_model_call(
            if response_text.is_ok() {
                status.as_str()
            } else {
                "body_error"
            },
            start.elapsed().as_secs_f64(),
        );
        let response_text = response_text.map_err(request_error)?;

        if !status.is_success() {
            error!(
                "Gemini API error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            return Err(status_error(status, &response_text));
        }

        debug!(
            "Raw Gemini response (first 300 chars): {}",
            response_text.chars().take(300).collect::<String>()
        );

        let reply = serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            HeadshotError::Transport {
                status: Some(status.as_u16()),
                message: format!("Response parsing error: {}", e),
                body: Some(Value::String(response_text.chars().take(1000).collect())),
            }
        })?;

        Ok((status, reply))
    }
}

#[async_trait]
impl ModelTransport for GeminiClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<ModelReply> {
        info!("Calling Gemini API: {}", self.config.model);
        let (status, reply) = self
            .post(request, Duration::from_secs(self.config.timeout_seconds))
            .await?;
        debug!("Gemini response status: {}", status);
        Ok(reply)
    }

    /// Sends a minimal `"ping"` request to verify the API is reachable and
    /// the key is accepted.
    async fn probe(&self) -> Result<ProbeReport> {
        debug!("Checking connectivity via {}", self.endpoint());

        let request = GenerateContentRequest {
            system_instruction: None,
            contents: vec![Content::user(vec![Part::text("ping")])],
        };

        let start = Instant::now();
        let (status, _) = self
            .post(
                &request,
                Duration::from_secs(self.config.probe_timeout_seconds),
            )
            .await?;

        let latency = start.elapsed();
        debug!("API connectivity check passed in {:?}", latency);

        Ok(ProbeReport {
            status: status.as_u16(),
            latency,
        })
    }
}

fn request_error(e: reqwest::Error) -> HeadshotError {
    let message = if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("HTTP error: {}", e)
    };
    HeadshotError::Transport {
        status: e.status().map(|s| s.as_u16()),
        message,
        body: None,
    }
}

fn status_error(status: StatusCode, response_text: &str) -> HeadshotError {
    let body = serde_json::from_str::<Value>(response_text)
        .unwrap_or_else(|_| Value::String(response_text.to_string()));
    let message = extract_error_message(&body)
        .map(|msg| format!("HTTP {}: {}", status.as_u16(), msg))
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));

    HeadshotError::Transport {
        status: Some(status.as_u16()),
        message,
        body: Some(body),
    }
}

/// Pull `error.message` (or `error.status`) out of a Google error body.
fn extract_error_message(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    error
        .get("message")
        .or_else(|| error.get("status"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
