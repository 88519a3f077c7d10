//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// System prompt for initial letter drafting
pub const DRAFT_SYSTEM: &str = include_str!("../../prompts/draft-system.pmt");

/// User prompt wrapping the compiled claim data (no-template path)
pub const INTAKE_LETTER: &str = include_str!("../../prompts/intake-letter.pmt");

/// System prompt for the completeness gap check
pub const GAP_SYSTEM: &str = include_str!("../../prompts/gap-system.pmt");

/// System prompt for correction turns
pub const CORRECTION_SYSTEM: &str = include_str!("../../prompts/correction-system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "draft-system" => Some(DRAFT_SYSTEM),
        "intake-letter" => Some(INTAKE_LETTER),
        "gap-system" => Some(GAP_SYSTEM),
        "correction-system" => Some(CORRECTION_SYSTEM),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_draft_system() {
        let prompt = get_embedded("draft-system").unwrap();
        assert!(prompt.contains("{{tone}}"));
        assert!(prompt.contains("claims correspondent"));
    }

    #[test]
    fn test_get_embedded_gap_system_forbids_invention() {
        let prompt = get_embedded("gap-system").unwrap();
        assert!(prompt.contains("Never invent"));
        assert!(prompt.contains("sufficient to draft the letter"));
        assert!(prompt.contains("one question per line"));
    }

    #[test]
    fn test_get_embedded_correction_preserves_structure() {
        let prompt = get_embedded("correction-system").unwrap();
        assert!(prompt.contains("preserving"));
        assert!(prompt.contains("{{tone}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
