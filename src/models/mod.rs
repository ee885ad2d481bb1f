//! Data models for the upstream Google Gemini API.
//!
//! Only the `generateContent` request is typed here; replies stay untyped.

// Author: kelexine (https://github.com/kelexine)

pub mod gemini;

pub use gemini::{Content, GenerateContentRequest, InlineData, Part, SystemInstruction};
