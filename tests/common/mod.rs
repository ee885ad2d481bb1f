// Shared fixtures for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use headshot_forge::error::{HeadshotError, Result};
use headshot_forge::gemini::{ModelReply, ModelTransport, ProbeReport};
use headshot_forge::models::GenerateContentRequest;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Minimal baseline JPEG: SOI, APP0, SOF0 with the given size, EOI.
pub fn jpeg_bytes(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    // APP0/JFIF
    bytes.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
    bytes.extend_from_slice(b"JFIF\0");
    bytes.extend_from_slice(&[0x01, 0x01, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00]);
    // SOF0: length 17, precision 8, height, width, 3 components
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

/// PNG signature plus an IHDR chunk.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend_from_slice(&13u32.to_be_bytes());
    bytes.extend_from_slice(b"IHDR");
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&[0x08, 0x06, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes
}

/// RIFF/WEBP container with an extended (VP8X) header.
pub fn webp_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = b"RIFF".to_vec();
    bytes.extend_from_slice(&22u32.to_le_bytes());
    bytes.extend_from_slice(b"WEBPVP8X");
    bytes.extend_from_slice(&10u32.to_le_bytes());
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    bytes.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    bytes
}

/// Reply carrying `bytes` as a camelCase inline-data part.
pub fn image_reply(bytes: &[u8], mime: &str) -> Value {
    json!({
        "candidates": [{
            "content": {
                "role": "model",
                "parts": [
                    { "text": "Here is your headshot." },
                    { "inlineData": { "mimeType": mime, "data": STANDARD.encode(bytes) } }
                ]
            },
            "finishReason": "STOP"
        }]
    })
}

/// Reply with text only, as returned when the model declines.
pub fn text_only_reply() -> Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": "I can't help with that." }] }
        }],
        "promptFeedback": { "blockReason": "OTHER" }
    })
}

/// Transport that replays queued replies and records every request it sees.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<ModelReply>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Result<ModelReply>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<ModelReply> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(HeadshotError::Transport {
                status: None,
                message: "no scripted reply left".to_string(),
                body: None,
            })
        })
    }

    async fn probe(&self) -> Result<ProbeReport> {
        Ok(ProbeReport {
            status: 200,
            latency: Duration::from_millis(5),
        })
    }
}
