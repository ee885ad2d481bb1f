// Naming and writing of accepted results
// Author: kelexine (https://github.com/kelexine)

use super::store::ContentStore;
use crate::error::{HeadshotError, Result};
use crate::extraction::ExtractedImage;
use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info};

/// Clock and entropy used to name a stored file.
///
/// Passed in explicitly so callers (and tests) control naming; the timestamp
/// orders names, the entropy keeps concurrent writers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameSeed {
    pub timestamp_ms: i64,
    pub entropy: u32,
}

impl NameSeed {
    /// Wall-clock milliseconds plus 32 random bits.
    pub fn now() -> Self {
        let random = uuid::Uuid::new_v4();
        let bytes = random.as_bytes();
        Self {
            timestamp_ms: chrono::Utc::now().timestamp_millis(),
            entropy: u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        }
    }

    /// `<prefix>-<millis>-<entropy>.<ext>`
    pub fn file_name(&self, prefix: &str, extension: &str) -> String {
        format!(
            "{}-{}-{:08x}.{}",
            prefix,
            self.timestamp_ms,
            self.entropy,
            extension.trim_start_matches('.')
        )
    }
}

/// `image/png→png`, `image/jpeg→jpg`, `image/webp→webp`, anything else `png`.
pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        _ => "png",
    }
}

/// Reference to a stored result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredResult {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Writes accepted images to the content store.
#[derive(Clone)]
pub struct Persister {
    store: Arc<dyn ContentStore>,
}

impl Persister {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    /// Store `image` as `result-<millis>-<entropy>.<ext>`.
    ///
    /// A write that leaves zero bytes behind is reported as its own failure.
    pub async fn persist(&self, image: &ExtractedImage, seed: NameSeed) -> Result<StoredResult> {
        let name = seed.file_name("result", extension_for_mime(&image.mime));

        if image.bytes.is_empty() {
            error!("Generated image is empty. mime: {}", image.mime);
            return Err(HeadshotError::Persistence("Generated image empty".to_string()));
        }

        let size = self
            .store
            .put(&name, &image.bytes)
            .await
            .map_err(|e| HeadshotError::Persistence(format!("Failed to write {}: {}", name, e)))?;

        if size == 0 {
            error!(
                "Saved file is empty. mime: {}, bytes: {}",
                image.mime,
                image.bytes.len()
            );
            return Err(HeadshotError::Persistence("Generated image empty".to_string()));
        }

        info!("Stored result {} ({} bytes, {})", name, size, image.mime);
        Ok(StoredResult {
            name,
            mime: image.mime.clone(),
            size,
        })
    }
}
