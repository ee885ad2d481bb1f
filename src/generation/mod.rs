//! Request orchestration and the identity guard.
//!
//! A request is one sequential pass (compile, call, extract, judge) plus at
//! most one escalated retry when the model echoes an input.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod guard;
pub mod pipeline;

pub use guard::{Decision, EchoSource, FailReason, IdentityGuard, MAX_ATTEMPTS};
pub use pipeline::{
    AcceptedImage, GenerationPipeline, GenerationReport, GenerationRequest, GenerationResult,
};

use crate::extraction::ExtractedImage;
use crate::imaging::ContentHash;
use crate::prompt::PromptPayload;

/// One request/response cycle.
#[derive(Debug, Clone)]
pub struct GenerationAttempt {
    /// 1 for the first call, 2 for the escalated retry.
    pub number: u8,
    pub payload: PromptPayload,
    pub extracted: Option<ExtractedImage>,
    pub candidate_hash: Option<ContentHash>,
    pub echo: Option<EchoSource>,
}

impl GenerationAttempt {
    /// Hash the extracted image (if any) and check it against the inputs.
    pub fn judge(
        guard: &IdentityGuard,
        number: u8,
        payload: PromptPayload,
        extracted: Option<ExtractedImage>,
    ) -> Self {
        let candidate_hash = extracted.as_ref().map(|image| ContentHash::of(&image.bytes));
        let echo = candidate_hash.as_ref().and_then(|hash| guard.echo_of(hash));
        Self {
            number,
            payload,
            extracted,
            candidate_hash,
            echo,
        }
    }

    pub fn is_echo(&self) -> bool {
        self.echo.is_some()
    }
}
