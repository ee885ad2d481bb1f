// Prompt compilation (GenerationMode + images -> PromptPayload)
// Author: kelexine (https://github.com/kelexine)

use super::styles::template_for;
use super::system::SYSTEM_PROMPT;
use crate::error::{HeadshotError, Result};
use crate::imaging::ImageAsset;
use crate::models::gemini::{Content, GenerateContentRequest, Part, SystemInstruction};
use tracing::{debug, warn};

const BASE_DIRECTIVE: &str = "Generate a NEW photorealistic portrait.";
const ENFORCED_DIRECTIVE: &str =
    "Generate a NEW photorealistic portrait. Do NOT return either input unchanged.";
const STYLE_ENFORCEMENT: &str =
    "Do NOT return the input image unchanged. Render a newly generated portrait.";

const SUBJECT_LABEL: &str = "IMAGE 1 (SUBJECT): This is the person whose face and identity MUST be preserved. Use this person's facial features, skin tone, hairline, glasses, and all distinctive characteristics.";
const SUBJECT_REINFORCEMENT: &str = "SUBJECT IDENTITY REINFORCEMENT: The face in the output MUST match the SUBJECT (IMAGE 1). Do not use any facial features from IMAGE 2.";
const REFERENCE_LABEL: &str = "IMAGE 2 (REFERENCE, style only, not identity): Borrow ONLY the outfit (suit/shirt/tie), pose, lighting, and background. Do NOT use the face or identity from this image. The face must come from IMAGE 1 (SUBJECT).";

/// Which generation flow a request runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationMode {
    /// One subject image steered by a curated style template.
    StyleSelect {
        style_key: String,
        free_text: Option<String>,
    },
    /// Subject image plus a second image that donates style, outfit and pose.
    ReferenceGuided { free_text: Option<String> },
}

impl GenerationMode {
    /// Pick the mode for an incoming request.
    ///
    /// A reference image wins over a style key. Free text is trimmed and
    /// dropped when blank.
    pub fn select(
        style: Option<&str>,
        free_text: Option<&str>,
        has_reference: bool,
    ) -> Result<Self> {
        let free_text = free_text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        // Any non-empty style selects style mode; a blank key gets the generic template
        let style = style.filter(|s| !s.is_empty()).map(str::trim);

        if has_reference {
            return Ok(GenerationMode::ReferenceGuided { free_text });
        }
        match style {
            Some(style_key) => Ok(GenerationMode::StyleSelect {
                style_key: style_key.to_string(),
                free_text,
            }),
            None => Err(HeadshotError::Validation(
                "Missing style or refId. Provide either a style selection or reference image."
                    .to_string(),
            )),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            GenerationMode::StyleSelect { .. } => "style",
            GenerationMode::ReferenceGuided { .. } => "reference",
        }
    }
}

/// Which input an image block points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRole {
    Subject,
    Reference,
}

/// One unit of a compiled payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Instruction(String),
    Image {
        role: ImageRole,
        label: Option<String>,
        asset: ImageAsset,
    },
}

/// Compiled request body for one attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub enforce_change: bool,
    pub blocks: Vec<ContentBlock>,
}

impl PromptPayload {
    /// Text of the leading instruction block.
    pub fn instruction(&self) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            ContentBlock::Instruction(text) => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn image_blocks(&self) -> impl Iterator<Item = (&ImageRole, Option<&str>, &ImageAsset)> {
        self.blocks.iter().filter_map(|block| match block {
            ContentBlock::Image { role, label, asset } => Some((role, label.as_deref(), asset)),
            _ => None,
        })
    }

    /// Wire form with the constant system instruction attached.
    ///
    /// Subject blocks share the first user turn; the reference image gets a
    /// turn of its own.
    pub fn to_request(&self) -> GenerateContentRequest {
        let mut subject_parts = Vec::new();
        let mut contents = Vec::new();

        for block in &self.blocks {
            match block {
                ContentBlock::Instruction(text) => subject_parts.push(Part::text(text.clone())),
                ContentBlock::Image { role, label, asset } => {
                    let mut parts = Vec::with_capacity(2);
                    if let Some(label) = label {
                        parts.push(Part::text(label.clone()));
                    }
                    parts.push(Part::inline(asset.mime_type(), asset.to_base64()));

                    match role {
                        ImageRole::Subject => subject_parts.extend(parts),
                        ImageRole::Reference => contents.push(Content::user(parts)),
                    }
                }
            }
        }

        contents.insert(0, Content::user(subject_parts));

        GenerateContentRequest {
            system_instruction: Some(SystemInstruction::new(SYSTEM_PROMPT)),
            contents,
        }
    }
}

/// Build the payload for one attempt. Pure: the same arguments always give
/// the same payload.
///
/// In reference mode a missing `reference` degrades the request to the
/// subject-only blocks; this is logged, not an error.
pub fn compile(
    mode: &GenerationMode,
    subject: &ImageAsset,
    reference: Option<&ImageAsset>,
    enforce_change: bool,
) -> PromptPayload {
    let blocks = match mode {
        GenerationMode::StyleSelect {
            style_key,
            free_text,
        } => {
            let mut instruction = template_for(style_key).to_string();
            if let Some(text) = free_text {
                instruction.push_str("\nAdditional instructions: ");
                instruction.push_str(text);
            }
            if enforce_change {
                instruction.push('\n');
                instruction.push_str(STYLE_ENFORCEMENT);
            }
            debug!(style = %style_key, enforce_change, "Compiled style payload");

            vec![
                ContentBlock::Instruction(instruction),
                ContentBlock::Image {
                    role: ImageRole::Subject,
                    label: None,
                    asset: subject.clone(),
                },
            ]
        }
        GenerationMode::ReferenceGuided { free_text } => {
            let directive = if enforce_change {
                ENFORCED_DIRECTIVE
            } else {
                BASE_DIRECTIVE
            };
            let instruction = format!("{}\n\n{}", directive, free_text.as_deref().unwrap_or(""))
                .trim()
                .to_string();

            let mut blocks = vec![
                ContentBlock::Instruction(instruction),
                ContentBlock::Image {
                    role: ImageRole::Subject,
                    label: Some(SUBJECT_LABEL.to_string()),
                    asset: subject.clone(),
                },
                ContentBlock::Image {
                    role: ImageRole::Subject,
                    label: Some(SUBJECT_REINFORCEMENT.to_string()),
                    asset: subject.clone(),
                },
            ];

            match reference {
                Some(reference) => blocks.push(ContentBlock::Image {
                    role: ImageRole::Reference,
                    label: Some(REFERENCE_LABEL.to_string()),
                    asset: reference.clone(),
                }),
                None => warn!("Reference image not available; sending subject only"),
            }
            debug!(blocks = blocks.len(), enforce_change, "Compiled reference payload");

            blocks
        }
    };

    PromptPayload {
        enforce_change,
        blocks,
    }
}
