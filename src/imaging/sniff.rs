// Header-only dimension sniffing for PNG, JPEG and WebP
// Author: kelexine (https://github.com/kelexine)

use super::models::{Dimensions, ImageFormat};
use crate::config::LimitsConfig;
use crate::error::{HeadshotError, Result};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Recover pixel dimensions from the container header.
///
/// Never fails: truncated or unrecognized buffers yield `None`. With an
/// `Unknown` hint every parser is tried in turn and the first hit wins.
pub fn sniff_dimensions(bytes: &[u8], hint: ImageFormat) -> Option<Dimensions> {
    match hint {
        ImageFormat::Png => png_dimensions(bytes),
        ImageFormat::Jpeg => jpeg_dimensions(bytes),
        ImageFormat::WebP => webp_dimensions(bytes),
        ImageFormat::Unknown => png_dimensions(bytes)
            .or_else(|| jpeg_dimensions(bytes))
            .or_else(|| webp_dimensions(bytes)),
    }
}

/// IHDR width/height live at bytes 16..24, big-endian.
fn png_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < 24 || !bytes.starts_with(PNG_SIGNATURE) {
        return None;
    }
    Some(Dimensions {
        width: read_u32_be(bytes, 16)?,
        height: read_u32_be(bytes, 20)?,
    })
}

/// Walk segments until a SOF0..SOF3 frame header shows up.
fn jpeg_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < 4 || bytes[0] != 0xFF || bytes[1] != 0xD8 {
        return None;
    }

    let mut i = 2;
    while i + 1 < bytes.len() {
        if bytes[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = bytes[i + 1];
        // Fill bytes before a marker
        if marker == 0xFF {
            i += 1;
            continue;
        }
        i += 2;

        match marker {
            // EOI or SOS: no frame header before the image data
            0xD9 | 0xDA => return None,
            // Standalone markers carry no length field
            0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        let len = read_u16_be(bytes, i)? as usize;
        if len < 2 {
            return None;
        }

        if (0xC0..=0xC3).contains(&marker) {
            // length(2) precision(1) height(2) width(2)
            let height = read_u16_be(bytes, i + 3)?;
            let width = read_u16_be(bytes, i + 5)?;
            return Some(Dimensions {
                width: u32::from(width),
                height: u32::from(height),
            });
        }

        i += len;
    }
    None
}

/// Only the extended (VP8X) header is understood; simple VP8/VP8L files
/// report unknown dimensions.
fn webp_dimensions(bytes: &[u8]) -> Option<Dimensions> {
    if bytes.len() < 16 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WEBP" {
        return None;
    }
    if &bytes[12..16] != b"VP8X" || bytes.len() < 30 {
        return None;
    }
    Some(Dimensions {
        width: 1 + read_u24_le(bytes, 24)?,
        height: 1 + read_u24_le(bytes, 27)?,
    })
}

fn read_u16_be(bytes: &[u8], at: usize) -> Option<u16> {
    let raw = bytes.get(at..at + 2)?;
    Some(u16::from_be_bytes([raw[0], raw[1]]))
}

fn read_u32_be(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at + 4)?;
    Some(u32::from_be_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

fn read_u24_le(bytes: &[u8], at: usize) -> Option<u32> {
    let raw = bytes.get(at..at + 3)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], 0]))
}

/// Maximum accepted input size. The default is effectively unbounded and
/// leaves real limits to the upstream provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionGate {
    pub max_width: u32,
    pub max_height: u32,
}

impl DimensionGate {
    pub fn unbounded() -> Self {
        Self {
            max_width: u32::MAX,
            max_height: u32::MAX,
        }
    }

    /// Reject known dimensions above the limits. Unknown dimensions pass.
    pub fn check(&self, dimensions: Option<Dimensions>) -> Result<()> {
        match dimensions {
            Some(d) if d.width > self.max_width || d.height > self.max_height => {
                Err(HeadshotError::Validation(format!(
                    "Image too large: {}. Max allowed is {}x{} px.",
                    d, self.max_width, self.max_height
                )))
            }
            _ => Ok(()),
        }
    }
}

impl Default for DimensionGate {
    fn default() -> Self {
        LimitsConfig::default().into()
    }
}

impl From<LimitsConfig> for DimensionGate {
    fn from(limits: LimitsConfig) -> Self {
        Self {
            max_width: limits.max_width,
            max_height: limits.max_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_header(width: u32, height: u32) -> Vec<u8> {
        let mut buf = PNG_SIGNATURE.to_vec();
        buf.extend_from_slice(&13u32.to_be_bytes());
        buf.extend_from_slice(b"IHDR");
        buf.extend_from_slice(&width.to_be_bytes());
        buf.extend_from_slice(&height.to_be_bytes());
        buf.extend_from_slice(&[8, 2, 0, 0, 0]);
        buf
    }

    #[test]
    fn test_png_dimensions() {
        let dims = sniff_dimensions(&png_header(640, 480), ImageFormat::Png).unwrap();
        assert_eq!(dims, Dimensions { width: 640, height: 480 });
    }

    #[test]
    fn test_png_truncated() {
        let header = png_header(640, 480);
        assert!(sniff_dimensions(&header[..20], ImageFormat::Png).is_none());
    }

    #[test]
    fn test_jpeg_skips_app_segments() {
        let mut buf = vec![0xFF, 0xD8];
        // APP0 with 16-byte segment
        buf.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x10]);
        buf.extend_from_slice(&[0u8; 14]);
        // SOF2 (progressive)
        buf.extend_from_slice(&[0xFF, 0xC2, 0x00, 0x11, 0x08, 0x02, 0x58, 0x03, 0x20]);
        buf.extend_from_slice(&[0u8; 10]);
        let dims = sniff_dimensions(&buf, ImageFormat::Jpeg).unwrap();
        assert_eq!(dims, Dimensions { width: 800, height: 600 });
    }

    #[test]
    fn test_jpeg_stops_at_start_of_scan() {
        let buf = [0xFF, 0xD8, 0xFF, 0xDA, 0x00, 0x08, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x10, 0x00, 0x10];
        assert!(sniff_dimensions(&buf, ImageFormat::Jpeg).is_none());
    }

    #[test]
    fn test_webp_extended() {
        let mut buf = b"RIFF\x00\x00\x00\x00WEBPVP8X".to_vec();
        buf.extend_from_slice(&[10, 0, 0, 0]); // chunk size
        buf.extend_from_slice(&[0, 0, 0, 0]); // flags + reserved
        buf.extend_from_slice(&[0xFF, 0x03, 0x00]); // 1023 -> 1024
        buf.extend_from_slice(&[0xFF, 0x02, 0x00]); // 767 -> 768
        let dims = sniff_dimensions(&buf, ImageFormat::WebP).unwrap();
        assert_eq!(dims, Dimensions { width: 1024, height: 768 });
    }

    #[test]
    fn test_webp_simple_is_unknown() {
        let mut buf = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        buf.extend_from_slice(&[0u8; 20]);
        assert!(sniff_dimensions(&buf, ImageFormat::WebP).is_none());
    }

    #[test]
    fn test_unknown_hint_tries_every_parser() {
        let dims = sniff_dimensions(&png_header(3, 7), ImageFormat::Unknown).unwrap();
        assert_eq!(dims, Dimensions { width: 3, height: 7 });
        assert!(sniff_dimensions(b"plain text, not an image", ImageFormat::Unknown).is_none());
    }

    #[test]
    fn test_gate() {
        let gate = DimensionGate {
            max_width: 1000,
            max_height: 1000,
        };
        assert!(gate.check(Some(Dimensions { width: 1000, height: 1000 })).is_ok());
        assert!(gate.check(None).is_ok());
        let err = gate
            .check(Some(Dimensions { width: 1001, height: 10 }))
            .unwrap_err();
        assert!(matches!(err, HeadshotError::Validation(_)));
        assert!(err.to_string().contains("1001x10"));
    }

    #[test]
    fn test_default_gate_is_effectively_unbounded() {
        let gate = DimensionGate::default();
        assert!(gate.check(Some(Dimensions { width: 65_535, height: 65_535 })).is_ok());
    }
}
