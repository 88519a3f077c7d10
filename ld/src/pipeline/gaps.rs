//! Gap Detector
//!
//! Asks the generation service whether the supplied claim data is
//! sufficient to draft a letter. Returns a list of clarifying questions;
//! an empty list signals sufficiency and unblocks the draft generator.

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::GenerationConfig;
use crate::domain::ClaimRecord;
use crate::llm::{CompletionRequest, GenerationError, LlmClient, Message};
use crate::pipeline::compiler;
use crate::prompts::PromptLoader;

/// Marker sentence fragment the gap prompt requires for sufficient data
pub const SUFFICIENCY_MARKER: &str = "sufficient to draft the letter";

/// Minimum trimmed line length for a response line to count as a question
///
/// Filters incidental blank lines and stray punctuation. Known heuristic:
/// a legitimately short question could be dropped.
pub const MIN_QUESTION_LEN: usize = 8;

/// A single clarifying question about missing claim data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapQuestion(pub String);

impl GapQuestion {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GapQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Checks whether claim data is complete enough to draft from
pub struct GapDetector {
    llm: Arc<dyn LlmClient>,
    prompts: Arc<PromptLoader>,
    temperature: f32,
    max_tokens: u32,
}

impl GapDetector {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: Arc<PromptLoader>, config: &GenerationConfig) -> Self {
        Self {
            llm,
            prompts,
            temperature: config.gap_temperature,
            max_tokens: config.gap_max_tokens,
        }
    }

    /// Check one claim for completeness
    ///
    /// Sends the fixed gap instruction and the compiled claim data at low
    /// temperature. Service errors propagate as [`GenerationError`]; no
    /// internal retry.
    pub async fn check(&self, record: &ClaimRecord) -> Result<Vec<GapQuestion>, GenerationError> {
        debug!(claim_id = %record.id, "GapDetector::check: called");
        let system_prompt = self
            .prompts
            .gap_system()
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let claim_data = compiler::claim_summary(record);

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(claim_data)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await?;
        let raw = response.into_text()?;
        let questions = parse_gap_response(&raw);
        info!(claim_id = %record.id, question_count = questions.len(), "Gap check complete");
        Ok(questions)
    }
}

/// Parse a raw gap-check response into clarifying questions
///
/// The sufficiency marker anywhere in the response means no gaps.
/// Otherwise each qualifying line becomes one question, order preserved.
pub fn parse_gap_response(raw: &str) -> Vec<GapQuestion> {
    debug!(raw_len = raw.len(), "parse_gap_response: called");
    if raw.contains(SUFFICIENCY_MARKER) {
        return Vec::new();
    }

    raw.lines()
        .map(|line| line.trim().trim_start_matches(['-', '*', '•']).trim_start())
        .filter(|line| line.len() >= MIN_QUESTION_LEN)
        .map(|line| GapQuestion(line.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::client::mock::MockLlmClient;

    fn detector(client: MockLlmClient) -> GapDetector {
        GapDetector::new(
            Arc::new(client),
            Arc::new(PromptLoader::embedded_only()),
            &GenerationConfig::default(),
        )
    }

    #[test]
    fn test_parse_sufficiency_marker_yields_empty_list() {
        let raw = "The provided claim information is sufficient to draft the letter.";
        assert!(parse_gap_response(raw).is_empty());
    }

    #[test]
    fn test_parse_questions_one_per_line_order_preserved() {
        let raw = "What is the policy number?\nWhen exactly did the incident occur?\n";
        let questions = parse_gap_response(raw);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].as_str(), "What is the policy number?");
        assert_eq!(questions[1].as_str(), "When exactly did the incident occur?");
    }

    #[test]
    fn test_parse_filters_blank_and_short_lines() {
        let raw = "\nWhat were the damages?\n\n- \nok?\n";
        let questions = parse_gap_response(raw);
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].as_str(), "What were the damages?");
    }

    #[test]
    fn test_parse_strips_list_markers() {
        let raw = "- What is the carrier name?\n* Who witnessed the incident?";
        let questions = parse_gap_response(raw);
        assert_eq!(questions[0].as_str(), "What is the carrier name?");
        assert_eq!(questions[1].as_str(), "Who witnessed the incident?");
    }

    #[tokio::test]
    async fn test_check_sufficient_claim() {
        let detector = detector(MockLlmClient::with_texts(&[
            "The provided claim information is sufficient to draft the letter.",
        ]));
        let record = ClaimRecord::new_intake("Complete claim");

        let questions = detector.check(&record).await.unwrap();
        assert!(questions.is_empty());
    }

    #[tokio::test]
    async fn test_check_incomplete_claim_returns_questions() {
        let detector = detector(MockLlmClient::with_texts(&[
            "What happened during the incident?\nWhat is the estimated cost of the damages?",
        ]));
        let record = ClaimRecord::new_intake("Sparse claim");

        let questions = detector.check(&record).await.unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions[0].as_str().contains("incident"));
    }

    #[tokio::test]
    async fn test_check_propagates_service_error() {
        let detector = detector(MockLlmClient::new(vec![Err(GenerationError::ApiError {
            status: 500,
            message: "Internal server error".to_string(),
        })]));
        let record = ClaimRecord::new_intake("Any claim");

        let err = detector.check(&record).await.unwrap_err();
        assert!(matches!(err, GenerationError::ApiError { status: 500, .. }));
    }
}
