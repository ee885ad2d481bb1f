// Headshot style templates
// Author: kelexine (https://github.com/kelexine)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction used when the style key is not one of the known styles.
pub const GENERIC_INSTRUCTION: &str = "Generate a professional headshot from this image.";

/// The four curated headshot styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Corporate,
    Creative,
    Executive,
    Medical,
}

impl Style {
    pub const ALL: [Style; 4] = [
        Style::Corporate,
        Style::Creative,
        Style::Executive,
        Style::Medical,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Style::Corporate => "corporate",
            Style::Creative => "creative",
            Style::Executive => "executive",
            Style::Medical => "medical",
        }
    }

    pub fn template(&self) -> &'static str {
        match self {
            Style::Corporate => "Generate a professional corporate headshot from this image. Preserve facial identity, natural skin tone, and realistic features. Create a neutral light background (white, light grey, or soft gradient), formal attire (suit, shirt, tie optional), natural lighting with clear facial features, confident but approachable expression, and a clean, minimalistic look suitable for corporate profiles.",
            Style::Creative => "Generate a creative professional headshot from this image. Preserve facial identity, natural skin tone, and realistic features. Create a background with subtle textures or muted colors, smart-casual attire (blazers, shirts, minimal accessories), slight smile with approachable expression, modern lighting with a soft glow, conveying creativity, energy, and professionalism without looking stiff.",
            Style::Executive => "Generate an executive portrait from this image. Preserve facial identity, natural skin tone, and realistic features. Create a high-end professional tone with premium, elegant background (dark gradient or subtle office backdrop), formal attire (suit, tie, optional lapel pin), confident commanding expression, professional lighting with soft shadows, suitable for corporate leadership.",
            Style::Medical => "Generate a medical professional headshot from this image. Preserve facial identity, natural skin tone, and realistic features. Create a white or soft neutral background, lab coat or medical attire, soft natural lighting, gentle approachable and trustworthy expression, suitable for dermatologists and healthcare professionals.",
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Style::ALL
            .into_iter()
            .find(|style| style.key() == s)
            .ok_or_else(|| format!("Unknown style: {}", s))
    }
}

/// Template for a caller-supplied style key, falling back to the generic
/// headshot instruction for anything unrecognized.
pub fn template_for(style_key: &str) -> &'static str {
    style_key
        .parse::<Style>()
        .map(|style| style.template())
        .unwrap_or(GENERIC_INSTRUCTION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_styles_round_trip_keys() {
        for style in Style::ALL {
            assert_eq!(style.key().parse::<Style>().unwrap(), style);
        }
    }

    #[test]
    fn test_templates_are_distinct() {
        let templates: std::collections::HashSet<_> =
            Style::ALL.iter().map(|s| s.template()).collect();
        assert_eq!(templates.len(), 4);
        assert!(!templates.contains(GENERIC_INSTRUCTION));
    }

    #[test]
    fn test_unknown_key_falls_back() {
        assert_eq!(template_for("vaporwave"), GENERIC_INSTRUCTION);
        assert_eq!(template_for("Corporate"), GENERIC_INSTRUCTION);
        assert_eq!(template_for("medical"), Style::Medical.template());
    }
}
