//! Sticker style catalog.
//!
//! Each style carries a stable wire key, a human-readable label shown in the
//! transform instruction, and the base prompt text the generation job builds
//! on. The base prompt is derived from the style at selection time and is
//! never independently settable.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The three sticker styles offered by the booth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StickerStyle {
    RealisticCutout,
    Cartoonize,
    TextIcons,
}

/// All styles, in the order they are presented to the client.
pub const ALL_STYLES: [StickerStyle; 3] = [
    StickerStyle::RealisticCutout,
    StickerStyle::Cartoonize,
    StickerStyle::TextIcons,
];

impl StickerStyle {
    /// Stable wire key (matches the serde representation).
    pub fn key(&self) -> &'static str {
        match self {
            Self::RealisticCutout => "realistic_cutout",
            Self::Cartoonize => "cartoonize",
            Self::TextIcons => "text_icons",
        }
    }

    /// Human-readable label, included verbatim in the transform instruction.
    pub fn label(&self) -> &'static str {
        match self {
            Self::RealisticCutout => "Realistic Cutout",
            Self::Cartoonize => "Cartoonize",
            Self::TextIcons => "Text & Icons",
        }
    }

    /// Base style instructions for the transform provider.
    pub fn base_prompt(&self) -> &'static str {
        match self {
            Self::RealisticCutout => {
                "Remove background cleanly, preserve subject edges, add a 8-10px white sticker border. \
                 No color shifts, keep original realism. Center the subject. Output 1024x1024 PNG."
            }
            Self::Cartoonize => {
                "Convert photo to a high-quality cartoon/illustration style with smooth shading, clean \
                 line art, vibrant but balanced colors. Keep subject identity and pose. Output 1024x1024 \
                 PNG with transparent background."
            }
            Self::TextIcons => {
                "Keep original photo, add playful overlays: text that is in the picture. Compose \
                 tastefully, avoid covering faces. Output 1024x1024 PNG with transparent background."
            }
        }
    }

    /// Parse a wire key into a style.
    pub fn from_key(key: &str) -> Result<Self, CoreError> {
        ALL_STYLES
            .into_iter()
            .find(|s| s.key() == key)
            .ok_or_else(|| CoreError::InvalidPayload(format!("Unknown style: {key}")))
    }
}
