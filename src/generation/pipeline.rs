// Generation pipeline: validate -> compile -> transport -> extract -> guard -> persist
// Author: kelexine (https://github.com/kelexine)

use super::guard::{Decision, FailReason, IdentityGuard, MAX_ATTEMPTS};
use super::GenerationAttempt;
use crate::error::{HeadshotError, Result};
use crate::extraction::{extract_image, summarize, ExtractedImage};
use crate::gemini::ModelTransport;
use crate::imaging::{DimensionGate, ImageAsset, ImageFormat};
use crate::prompt::{compile, GenerationMode};
use crate::storage::{NameSeed, Persister, StoredResult};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything one generation needs, already loaded.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub mode: GenerationMode,
    pub subject: ImageAsset,
    pub reference: Option<ImageAsset>,
}

/// An image the guard accepted, with the attempts that led to it.
#[derive(Debug, Clone)]
pub struct AcceptedImage {
    pub asset: ImageAsset,
    pub mime: String,
    pub attempts: Vec<GenerationAttempt>,
}

/// A stored generation.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub stored: StoredResult,
    pub asset: ImageAsset,
    pub attempts: Vec<GenerationAttempt>,
}

/// Terminal outcome of a request: `Ok` is the accepted, stored image;
/// `Err` carries the failure kind and reason.
pub type GenerationResult = Result<GenerationReport>;

/// Runs requests against one transport. Holds no per-request state, so a
/// single pipeline serves concurrent requests.
#[derive(Clone)]
pub struct GenerationPipeline {
    transport: Arc<dyn ModelTransport>,
    persister: Persister,
    gate: DimensionGate,
    model: String,
}

impl GenerationPipeline {
    pub fn new(
        transport: Arc<dyn ModelTransport>,
        persister: Persister,
        gate: DimensionGate,
        model: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            persister,
            gate,
            model: model.into(),
        }
    }

    /// Validate, generate and store. `seed` names the stored result.
    pub async fn run(&self, request: &GenerationRequest, seed: NameSeed) -> GenerationResult {
        let result = self.generate_and_store(request, seed).await;
        crate::metrics::record_generation(
            request.mode.label(),
            result.as_ref().map(|_| "accepted").unwrap_or_else(|e| e.kind()),
        );
        result
    }

    async fn generate_and_store(
        &self,
        request: &GenerationRequest,
        seed: NameSeed,
    ) -> GenerationResult {
        let accepted = self.generate(request).await?;

        let extracted = ExtractedImage {
            bytes: accepted.asset.bytes().to_vec(),
            mime: accepted.mime.clone(),
        };
        let stored = self.persister.persist(&extracted, seed).await?;

        Ok(GenerationReport {
            stored,
            asset: accepted.asset,
            attempts: accepted.attempts,
        })
    }

    /// Validate inputs and run at most two attempts, without storing.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<AcceptedImage> {
        self.validate(request)?;

        let guard = IdentityGuard::new(&request.subject, request.reference.as_ref());
        let mut attempts = Vec::with_capacity(MAX_ATTEMPTS as usize);

        for number in 1..=MAX_ATTEMPTS {
            let enforce_change = number > 1;
            let payload = compile(
                &request.mode,
                &request.subject,
                request.reference.as_ref(),
                enforce_change,
            );

            info!(
                "Generation attempt {}/{} (mode={}, blocks={}, enforce_change={})",
                number,
                MAX_ATTEMPTS,
                request.mode.label(),
                payload.blocks.len(),
                enforce_change
            );

            let reply = self.transport.generate(&payload.to_request()).await?;
            let extracted = extract_image(&reply);
            let attempt = GenerationAttempt::judge(&guard, number, payload, extracted);
            let decision = guard.decide(&attempt);
            attempts.push(attempt);

            match decision {
                Decision::Accept => {
                    let last = attempts.last().and_then(|a| a.extracted.as_ref());
                    let Some(image) = last else {
                        return Err(HeadshotError::Internal(
                            "Accepted attempt without an image".to_string(),
                        ));
                    };
                    let asset = ImageAsset::new(
                        image.bytes.clone(),
                        ImageFormat::from_mime_type(&image.mime),
                    );
                    let mime = image.mime.clone();
                    info!("Accepted generated image {} after {} attempt(s)", asset.hash(), number);
                    return Ok(AcceptedImage {
                        asset,
                        mime,
                        attempts,
                    });
                }
                Decision::Retry => {
                    warn!("Model returned one of the input images; retrying with enforce_change");
                    crate::metrics::record_echo_retry();
                }
                Decision::Fail(FailReason::NoImage) => {
                    let (summary, prompt_feedback) = summarize(&reply);
                    warn!("No image returned by model {} ({})", self.model, summary);
                    return Err(HeadshotError::Extraction {
                        summary,
                        prompt_feedback,
                    });
                }
                Decision::Fail(FailReason::EchoedInput) => {
                    warn!("Model echoed an input again after retry");
                    return Err(HeadshotError::Echo);
                }
            }
        }

        Err(HeadshotError::Echo)
    }

    fn validate(&self, request: &GenerationRequest) -> Result<()> {
        if request.subject.is_empty() {
            return Err(HeadshotError::Validation("Subject image is empty".to_string()));
        }
        self.gate.check(request.subject.dimensions())?;
        if let Some(reference) = &request.reference {
            self.gate.check(reference.dimensions())?;
        }
        Ok(())
    }
}
