//! Deep search for an image payload inside an untyped model reply.
//!
//! The generation endpoint does not guarantee where (or how) an image shows
//! up in its reply. Four encodings are recognized, checked in this order at
//! every node of a depth-first walk:
//!
//! 1. an inline-binary object (`inline_data` / `inlineData` with `data` and
//!    `mime_type` / `mimeType`),
//! 2. a `text` field containing a `data:image/...;base64,` URI,
//! 3. a bare string node containing such a URI,
//! 4. a long, pure-base64 string under a data-carrier key, taken as PNG.
//!
//! The walk first covers `candidates[*].content.parts[*]` in order and only
//! then the whole reply. Object keys are visited in `serde_json`'s map order
//! (sorted), so the result is the same for the same reply every time.
//!
//! Rule 4 can misfire on unrelated base64 data. It is kept for compatibility
//! with provider replies that carry raw payloads.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::debug;

/// Minimum length for the bare-base64 fallback.
pub const MIN_HEURISTIC_LEN: usize = 100;

/// Keys whose string values may carry raw base64 image data.
const DATA_CARRIER_KEYS: [&str; 3] = ["data", "b64_json", "base64"];

static DATA_URI_REGEX: OnceLock<Regex> = OnceLock::new();
static BASE64_ONLY_REGEX: OnceLock<Regex> = OnceLock::new();

fn data_uri_regex() -> &'static Regex {
    DATA_URI_REGEX.get_or_init(|| {
        Regex::new(r"(?i)data:(image/(?:png|jpeg|jpg|webp));base64,([A-Za-z0-9+/=]+)")
            .expect("Invalid regex pattern")
    })
}

fn base64_only_regex() -> &'static Regex {
    BASE64_ONLY_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9+/=]+$").expect("Invalid regex pattern"))
}

/// Standard alphabet; padding optional since providers are inconsistent.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Image bytes recovered from a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Which rule produced a match. Only used for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    InlineData,
    TextDataUri,
    BareDataUri,
    Base64Field,
}

/// Return the first image found in `reply`, or `None`.
pub fn extract_image(reply: &Value) -> Option<ExtractedImage> {
    extract_with_encoding(reply).map(|(image, _)| image)
}

/// Same as [`extract_image`], also reporting which encoding matched.
pub fn extract_with_encoding(reply: &Value) -> Option<(ExtractedImage, Encoding)> {
    let scoped = candidate_parts(reply).find_map(deep_search);
    let found = scoped.or_else(|| {
        debug!("No image in candidate parts, searching entire reply");
        deep_search(reply)
    });

    if let Some((image, encoding)) = &found {
        debug!(
            "Extracted {} bytes of {} via {:?}",
            image.bytes.len(),
            image.mime,
            encoding
        );
    }
    found
}

/// Short diagnostic for a reply with no image: candidate count plus the
/// provider's `promptFeedback`, if any.
pub fn summarize(reply: &Value) -> (String, Option<Value>) {
    let summary = match reply.get("candidates").and_then(Value::as_array) {
        Some(candidates) => format!("candidates={}", candidates.len()),
        None => "no candidates".to_string(),
    };
    let feedback = reply
        .get("promptFeedback")
        .or_else(|| reply.get("prompt_feedback"))
        .cloned();
    (summary, feedback)
}

/// `candidates[*].content.parts[*]`, in order.
fn candidate_parts(reply: &Value) -> impl Iterator<Item = &Value> {
    reply
        .get("candidates")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|candidate| {
            candidate
                .get("content")
                .and_then(|content| content.get("parts"))
                .and_then(Value::as_array)
        })
        .flatten()
}

fn deep_search(node: &Value) -> Option<(ExtractedImage, Encoding)> {
    match node {
        Value::String(s) => parse_data_uri(s).map(|image| (image, Encoding::BareDataUri)),
        Value::Array(items) => items.iter().find_map(deep_search),
        Value::Object(map) => {
            if let Some(image) = ["inline_data", "inlineData"]
                .iter()
                .filter_map(|key| map.get(*key))
                .find_map(parse_inline_data)
            {
                return Some((image, Encoding::InlineData));
            }

            if let Some(image) = map
                .get("text")
                .and_then(Value::as_str)
                .and_then(parse_data_uri)
            {
                return Some((image, Encoding::TextDataUri));
            }

            if let Some(image) = DATA_CARRIER_KEYS
                .iter()
                .filter_map(|key| map.get(*key).and_then(Value::as_str))
                .find_map(parse_base64_field)
            {
                return Some((image, Encoding::Base64Field));
            }

            map.values().find_map(deep_search)
        }
        _ => None,
    }
}

fn parse_inline_data(inline: &Value) -> Option<ExtractedImage> {
    let data = inline.get("data").and_then(Value::as_str)?;
    if data.is_empty() {
        return None;
    }
    let mime = inline
        .get("mime_type")
        .or_else(|| inline.get("mimeType"))
        .and_then(Value::as_str)
        .map(normalize_mime)
        .unwrap_or_else(|| "image/png".to_string());
    decode(data, mime)
}

fn parse_data_uri(text: &str) -> Option<ExtractedImage> {
    let captures = data_uri_regex().captures(text)?;
    let mime = normalize_mime(&captures[1]);
    decode(&captures[2], mime)
}

fn parse_base64_field(data: &str) -> Option<ExtractedImage> {
    if data.len() <= MIN_HEURISTIC_LEN || !base64_only_regex().is_match(data) {
        return None;
    }
    decode(data, "image/png".to_string())
}

/// Lower-case and map `image/jpg` to `image/jpeg`.
pub fn normalize_mime(mime: &str) -> String {
    let mime = mime.trim().to_lowercase();
    if mime == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        mime
    }
}

/// Undecodable payloads do not count as a match; the search moves on.
fn decode(data: &str, mime: String) -> Option<ExtractedImage> {
    match LENIENT_BASE64.decode(data) {
        Ok(bytes) if !bytes.is_empty() => Some(ExtractedImage { bytes, mime }),
        Ok(_) => None,
        Err(e) => {
            debug!("Skipping undecodable image payload: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn b64(bytes: &[u8]) -> String {
        base64::engine::general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn test_inline_data_snake_and_camel() {
        let snake = json!({"candidates": [{"content": {"parts": [
            {"inline_data": {"mime_type": "image/webp", "data": b64(b"snake")}}
        ]}}]});
        let camel = json!({"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/jpeg", "data": b64(b"camel")}}
        ]}}]});

        let (image, encoding) = extract_with_encoding(&snake).unwrap();
        assert_eq!(image.bytes, b"snake");
        assert_eq!(image.mime, "image/webp");
        assert_eq!(encoding, Encoding::InlineData);

        let image = extract_image(&camel).unwrap();
        assert_eq!(image.bytes, b"camel");
        assert_eq!(image.mime, "image/jpeg");
    }

    #[test]
    fn test_inline_data_defaults_to_png() {
        let reply = json!({"candidates": [{"content": {"parts": [
            {"inlineData": {"data": b64(b"no mime")}}
        ]}}]});
        assert_eq!(extract_image(&reply).unwrap().mime, "image/png");
    }

    #[test]
    fn test_text_data_uri_normalizes_jpg() {
        let text = format!("Here you go: data:image/JPG;base64,{} enjoy", b64(b"jpeg bytes"));
        let reply = json!({"candidates": [{"content": {"parts": [{"text": text}]}}]});

        let (image, encoding) = extract_with_encoding(&reply).unwrap();
        assert_eq!(image.mime, "image/jpeg");
        assert_eq!(image.bytes, b"jpeg bytes");
        assert_eq!(encoding, Encoding::TextDataUri);
    }

    #[test]
    fn test_bare_string_data_uri() {
        let uri = format!("data:image/png;base64,{}", b64(b"bare"));
        let reply = json!({"output": {"images": [uri]}});

        let (image, encoding) = extract_with_encoding(&reply).unwrap();
        assert_eq!(image.bytes, b"bare");
        assert_eq!(encoding, Encoding::BareDataUri);
    }

    #[test]
    fn test_heuristic_requires_length() {
        let short = json!({"result": {"data": b64(&[7u8; 30])}});
        assert!(extract_image(&short).is_none());

        let long = json!({"result": {"data": b64(&[7u8; 120])}});
        let (image, encoding) = extract_with_encoding(&long).unwrap();
        assert_eq!(image.bytes, vec![7u8; 120]);
        assert_eq!(image.mime, "image/png");
        assert_eq!(encoding, Encoding::Base64Field);
    }

    #[test]
    fn test_heuristic_rejects_non_base64_text() {
        let prose = "a".repeat(60) + " not base64 at all " + &"b".repeat(60);
        assert!(extract_image(&json!({"data": prose})).is_none());
    }

    #[test]
    fn test_first_candidate_part_wins() {
        let reply = json!({"candidates": [
            {"content": {"parts": [
                {"text": "thinking about it"},
                {"inlineData": {"mimeType": "image/png", "data": b64(b"first")}}
            ]}},
            {"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": b64(b"second")}}
            ]}}
        ]});
        assert_eq!(extract_image(&reply).unwrap().bytes, b"first");
    }

    #[test]
    fn test_candidates_searched_before_rest_of_reply() {
        let reply = json!({
            "aaa_debug": {"inlineData": {"mimeType": "image/png", "data": b64(b"outside")}},
            "candidates": [{"content": {"parts": [
                {"inlineData": {"mimeType": "image/png", "data": b64(b"inside")}}
            ]}}]
        });
        assert_eq!(extract_image(&reply).unwrap().bytes, b"inside");
    }

    #[test]
    fn test_unscoped_fallback() {
        let reply = json!({"response": {"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/webp", "data": b64(b"wrapped")}}
        ]}}]}});
        let image = extract_image(&reply).unwrap();
        assert_eq!(image.bytes, b"wrapped");
        assert_eq!(image.mime, "image/webp");
    }

    #[test]
    fn test_no_image() {
        let reply = json!({
            "candidates": [{"content": {"parts": [{"text": "I can't help with that."}]}}],
            "promptFeedback": {"blockReason": "SAFETY"}
        });
        assert!(extract_image(&reply).is_none());

        let (summary, feedback) = summarize(&reply);
        assert_eq!(summary, "candidates=1");
        assert_eq!(feedback.unwrap()["blockReason"], "SAFETY");
        assert_eq!(summarize(&json!({})).0, "no candidates");
    }

    #[test]
    fn test_undecodable_inline_is_skipped() {
        let reply = json!({"candidates": [{"content": {"parts": [
            {"inlineData": {"mimeType": "image/png", "data": "!!!not base64!!!"}},
            {"inlineData": {"mimeType": "image/png", "data": b64(b"good")}}
        ]}}]});
        assert_eq!(extract_image(&reply).unwrap().bytes, b"good");
    }

    #[test]
    fn test_scalars_yield_nothing() {
        assert!(extract_image(&json!(null)).is_none());
        assert!(extract_image(&json!(42)).is_none());
        assert!(extract_image(&json!("just words")).is_none());
    }
}
