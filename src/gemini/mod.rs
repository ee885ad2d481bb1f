// Gemini API client module
// Author: kelexine (https://github.com/kelexine)

mod client;

pub use client::GeminiClient;

use crate::error::Result;
use crate::models::gemini::GenerateContentRequest;
use async_trait::async_trait;
use std::time::Duration;

/// Raw reply from the generation endpoint. Its image-bearing shape is not
/// fixed, so it stays an untyped JSON document.
pub type ModelReply = serde_json::Value;

/// Outcome of a connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    pub status: u16,
    pub latency: Duration,
}

/// The one upstream call the pipeline makes.
#[async_trait]
pub trait ModelTransport: Send + Sync {
    /// Send one compiled request. Exactly one HTTP attempt, bounded by the
    /// generation timeout.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<ModelReply>;

    /// Zero-content reachability check with the short probe timeout.
    async fn probe(&self) -> Result<ProbeReport>;
}
