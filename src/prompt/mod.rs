//! Prompt compilation for the two generation modes.
//!
//! - `compiler`: `GenerationMode`, `PromptPayload` and the pure `compile` step.
//! - `styles`: the curated style templates.
//! - `system`: the constant identity-preservation system instruction.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod compiler;
pub mod styles;
pub mod system;

pub use compiler::{compile, ContentBlock, GenerationMode, ImageRole, PromptPayload};
pub use styles::Style;
pub use system::SYSTEM_PROMPT;
