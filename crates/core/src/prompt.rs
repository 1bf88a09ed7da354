//! Transform instruction composition.
//!
//! The instruction sent to the provider for each of the four images is the
//! concatenation of a fixed system preamble, the style's human-readable
//! label, the base style instructions, and the per-image user refinement
//! (with a fixed placeholder when the refinement is blank).

use crate::job::RESULT_IMAGE_COUNT;
use crate::style::StickerStyle;

/// Fixed preamble prepended to every transform instruction to keep output
/// consistent across styles.
pub const SYSTEM_PREAMBLE: &str = "You are an expert sticker-maker. Produce one high-quality PNG \
     suitable for printing stickers. Prefer transparent backgrounds when applicable. Keep the \
     subject centered and sharp.";

/// Placeholder used when a per-image refinement is empty or whitespace-only.
pub const EMPTY_REFINEMENT_PLACEHOLDER: &str = "No additional requirement.";

/// Compose the full instruction for one generation step.
pub fn compose_instruction(style: StickerStyle, base_prompt: &str, refinement: &str) -> String {
    let refinement = refinement.trim();
    let refinement = if refinement.is_empty() {
        EMPTY_REFINEMENT_PLACEHOLDER
    } else {
        refinement
    };

    format!(
        "{SYSTEM_PREAMBLE}\nStyle: {}\nInstructions: {base_prompt}\n\nAdditional requirement: {refinement}",
        style.label(),
    )
}

/// Normalize client-supplied refinements to exactly [`RESULT_IMAGE_COUNT`]
/// entries. Missing entries become empty strings; extras are dropped.
pub fn normalize_refinements(prompts: Vec<String>) -> [String; RESULT_IMAGE_COUNT] {
    let mut out: [String; RESULT_IMAGE_COUNT] = Default::default();
    for (slot, prompt) in out.iter_mut().zip(prompts) {
        *slot = prompt;
    }
    out
}
