//! Drafting session conversation log
//!
//! An append-only, ordered log of generation turns for one claim's drafting
//! session. The current draft is always the content of the most recent
//! assistant-response turn. The log lives for the editing session only;
//! durable state is the claim's persisted `generated_content`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Role of a turn in the drafting conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnRole {
    /// A prompt the pipeline sent to the generation service
    SystemRequest,
    /// A draft the generation service produced
    AssistantResponse,
}

/// One entry in a drafting conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl GenerationTurn {
    /// Create a request turn stamped with the current time
    pub fn request(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::SystemRequest,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a response turn stamped with the current time
    pub fn response(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::AssistantResponse,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only turn log scoped to one claim's drafting session
///
/// Strictly FIFO: turns can be appended and read, never removed or
/// reordered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTracker {
    claim_id: String,
    turns: Vec<GenerationTurn>,
}

impl SessionTracker {
    /// Start an empty session for a claim
    pub fn new(claim_id: impl Into<String>) -> Self {
        let claim_id = claim_id.into();
        debug!(%claim_id, "SessionTracker::new: called");
        Self {
            claim_id,
            turns: Vec::new(),
        }
    }

    /// Claim this session belongs to
    pub fn claim_id(&self) -> &str {
        &self.claim_id
    }

    /// Append a turn to the log
    pub fn append(&mut self, turn: GenerationTurn) {
        debug!(claim_id = %self.claim_id, role = ?turn.role, "SessionTracker::append: called");
        self.turns.push(turn);
    }

    /// Content of the most recent assistant-response turn, if any
    pub fn latest_assistant_content(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::AssistantResponse)
            .map(|t| t.content.as_str())
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[GenerationTurn] {
        &self.turns
    }

    /// Number of turns in the log
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_session_has_no_draft() {
        let session = SessionTracker::new("claim-1");
        assert!(session.is_empty());
        assert!(session.latest_assistant_content().is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut session = SessionTracker::new("claim-1");
        session.append(GenerationTurn::request("prompt"));
        session.append(GenerationTurn::response("draft one"));

        assert_eq!(session.len(), 2);
        assert_eq!(session.turns()[0].role, TurnRole::SystemRequest);
        assert_eq!(session.turns()[1].role, TurnRole::AssistantResponse);
    }

    #[test]
    fn test_latest_assistant_content_tracks_most_recent() {
        let mut session = SessionTracker::new("claim-1");
        session.append(GenerationTurn::request("initial prompt"));
        session.append(GenerationTurn::response("draft one"));
        assert_eq!(session.latest_assistant_content(), Some("draft one"));

        session.append(GenerationTurn::request("make it shorter"));
        session.append(GenerationTurn::response("draft two"));
        assert_eq!(session.latest_assistant_content(), Some("draft two"));
    }

    #[test]
    fn test_latest_assistant_content_skips_trailing_requests() {
        let mut session = SessionTracker::new("claim-1");
        session.append(GenerationTurn::response("draft one"));
        session.append(GenerationTurn::request("pending instruction"));
        assert_eq!(session.latest_assistant_content(), Some("draft one"));
    }
}
