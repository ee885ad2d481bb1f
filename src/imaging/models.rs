// Image asset types
// Author: kelexine (https://github.com/kelexine)

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;

use super::sniff::sniff_dimensions;

/// Container formats the service understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Unknown,
}

impl ImageFormat {
    /// Get MIME type for this format.
    ///
    /// Unknown containers are sent upstream as JPEG, which is what the
    /// upload path assumes for unrecognized extensions.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Jpeg | ImageFormat::Unknown => "image/jpeg",
        }
    }

    /// Try to detect format from MIME type
    pub fn from_mime_type(mime: &str) -> Self {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => ImageFormat::Png,
            "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
            "image/webp" => ImageFormat::WebP,
            _ => ImageFormat::Unknown,
        }
    }

    /// Format hint from a file name or bare extension (`.png`, `jpg`, ...)
    pub fn from_extension(name: &str) -> Self {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or(name)
            .to_lowercase();
        match ext.as_str() {
            "png" => ImageFormat::Png,
            "jpg" | "jpeg" => ImageFormat::Jpeg,
            "webp" => ImageFormat::WebP,
            _ => ImageFormat::Unknown,
        }
    }

    /// Detect format from magic bytes at start of image data
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(b"\x89PNG\r\n\x1a\n") {
            ImageFormat::Png
        } else if data.starts_with(b"\xFF\xD8\xFF") {
            ImageFormat::Jpeg
        } else if data.len() >= 12 && data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            ImageFormat::WebP
        } else {
            ImageFormat::Unknown
        }
    }

    /// File extension used when storing an image of this format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::WebP => "webp",
            ImageFormat::Unknown => "bin",
        }
    }
}

/// Pixel dimensions recovered from a container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// SHA-256 digest of an image's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub fn of(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// An uploaded or generated image.
///
/// Assets are immutable once built: the hash and dimensions are computed in
/// [`ImageAsset::new`] and never change. Cloning is cheap, the bytes are
/// shared.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    bytes: Arc<[u8]>,
    format: ImageFormat,
    dimensions: Option<Dimensions>,
    hash: ContentHash,
}

impl ImageAsset {
    /// Build an asset from raw bytes and a declared format.
    pub fn new(bytes: impl Into<Arc<[u8]>>, format: ImageFormat) -> Self {
        let bytes = bytes.into();
        let dimensions = sniff_dimensions(&bytes, format);
        let hash = ContentHash::of(&bytes);
        Self {
            bytes,
            format,
            dimensions,
            hash,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn dimensions(&self) -> Option<Dimensions> {
        self.dimensions
    }

    pub fn hash(&self) -> ContentHash {
        self.hash
    }

    /// Standard base64 of the raw bytes, as sent in `inline_data`.
    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

impl PartialEq for ImageAsset {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for ImageAsset {}
