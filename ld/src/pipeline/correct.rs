//! Correction Engine
//!
//! Applies a free-text revision instruction to the latest draft in a
//! session, appending the revised letter as a new turn and overwriting the
//! persisted content.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::domain::{GenerationTurn, SessionTracker, Tone};
use crate::llm::{CompletionRequest, GenerationError, LlmClient, Message};
use crate::pipeline::gateway::{ClaimGateway, ContentUpdate};
use crate::pipeline::{DraftOutcome, PipelineError};
use crate::prompts::PromptLoader;

/// Revises drafts according to conversational instructions
pub struct CorrectionEngine {
    llm: Arc<dyn LlmClient>,
    gateway: Arc<dyn ClaimGateway>,
    prompts: Arc<PromptLoader>,
    temperature: f32,
    max_tokens: u32,
}

impl CorrectionEngine {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        gateway: Arc<dyn ClaimGateway>,
        prompts: Arc<PromptLoader>,
        config: &GenerationConfig,
    ) -> Self {
        Self {
            llm,
            gateway,
            prompts,
            temperature: config.correction_temperature,
            max_tokens: config.draft_max_tokens,
        }
    }

    /// Apply one correction turn to the session's current draft
    ///
    /// The input draft is always the most recent assistant-response turn.
    /// On success the revised letter is appended to the session as a new
    /// assistant-response turn and overwrites the stored content; on a
    /// generation failure neither happens. A persistence failure still
    /// returns the revised text, flagged `persisted: false`.
    pub async fn apply(
        &self,
        claim_id: &str,
        session: &mut SessionTracker,
        instruction: &str,
        tone: Tone,
    ) -> Result<DraftOutcome, PipelineError> {
        debug!(%claim_id, %instruction, "CorrectionEngine::apply: called");
        let current_draft = session
            .latest_assistant_content()
            .ok_or(PipelineError::EmptySession)?
            .to_string();

        let system_prompt = self
            .prompts
            .correction_system(tone)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        // Both draft and instruction travel in one user message: the
        // Messages API rejects conversations that open with an assistant turn
        let user_prompt = format!(
            "Current letter:\n\n{}\n\nRevision instruction: {}",
            current_draft, instruction
        );
        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(user_prompt)],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await.map_err(PipelineError::Generation)?;
        let usage = response.usage;
        let text = response.into_text().map_err(PipelineError::Generation)?;
        info!(
            %claim_id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Correction applied"
        );

        session.append(GenerationTurn::response(text.clone()));

        let persisted = match self.gateway.update_claim_content(claim_id, ContentUpdate::now(text.clone(), None)) {
            Ok(()) => true,
            Err(e) => {
                warn!(%claim_id, error = %e, "Correction produced but not saved");
                false
            }
        };

        Ok(DraftOutcome { text, persisted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimstore::ClaimStore;

    use crate::domain::ClaimRecord;
    use crate::llm::client::mock::MockLlmClient;

    fn engine(client: MockLlmClient, store: Arc<ClaimStore>) -> CorrectionEngine {
        CorrectionEngine::new(
            Arc::new(client),
            store,
            Arc::new(PromptLoader::embedded_only()),
            &GenerationConfig::default(),
        )
    }

    fn stored_claim(store: &ClaimStore) -> ClaimRecord {
        let record = ClaimRecord::new_intake("Rear-end collision");
        store.put(&record.id, &serde_json::to_value(&record).unwrap()).unwrap();
        record
    }

    fn seeded_session(claim_id: &str, draft: &str) -> SessionTracker {
        let mut session = SessionTracker::new(claim_id);
        session.append(GenerationTurn::request("initial prompt"));
        session.append(GenerationTurn::response(draft));
        session
    }

    #[tokio::test]
    async fn test_apply_appends_exactly_one_response_turn_and_persists() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let engine = engine(MockLlmClient::with_texts(&["Dear Valued Claims Team,"]), store.clone());
        let mut session = seeded_session(&record.id, "Dear Sir/Madam,");
        let before = session.len();

        let outcome = engine
            .apply(&record.id, &mut session, "make the tone more empathetic", Tone::Empathetic)
            .await
            .unwrap();

        assert_eq!(outcome.text, "Dear Valued Claims Team,");
        assert!(outcome.persisted);
        // One correction grows the log by exactly one assistant-response turn
        assert_eq!(session.len(), before + 1);
        assert_eq!(session.turns().last().unwrap().role, crate::domain::TurnRole::AssistantResponse);
        assert_eq!(session.latest_assistant_content(), Some("Dear Valued Claims Team,"));

        let loaded = store.get_claim(&record.id).unwrap().unwrap();
        assert_eq!(loaded.generated_content.as_deref(), Some("Dear Valued Claims Team,"));
    }

    #[tokio::test]
    async fn test_apply_sends_draft_and_instruction_in_one_user_message() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let client = Arc::new(MockLlmClient::with_texts(&["Revised letter"]));
        let engine = CorrectionEngine::new(
            client.clone(),
            store,
            Arc::new(PromptLoader::embedded_only()),
            &GenerationConfig::default(),
        );
        let mut session = seeded_session(&record.id, "Dear Sir/Madam,");

        engine
            .apply(&record.id, &mut session, "make it firmer", Tone::Firm)
            .await
            .unwrap();

        // Chat-completion providers require the conversation to open with a
        // user message, so the draft must not ride in an assistant turn
        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 1);
        assert_eq!(requests[0].messages[0].role, crate::llm::Role::User);
        assert!(requests[0].messages[0].content.contains("Dear Sir/Madam,"));
        assert!(requests[0].messages[0].content.contains("make it firmer"));
    }

    #[tokio::test]
    async fn test_apply_reads_most_recent_draft_across_sequential_corrections() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let engine = engine(MockLlmClient::with_texts(&["Draft two", "Draft three"]), store.clone());
        let mut session = seeded_session(&record.id, "Draft one");

        engine.apply(&record.id, &mut session, "shorten it", Tone::Formal).await.unwrap();
        assert_eq!(session.latest_assistant_content(), Some("Draft two"));

        engine.apply(&record.id, &mut session, "add a closing", Tone::Formal).await.unwrap();
        assert_eq!(session.latest_assistant_content(), Some("Draft three"));
        // Two seed turns plus one response turn per correction
        assert_eq!(session.len(), 4);
    }

    #[tokio::test]
    async fn test_apply_on_empty_session_is_error() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let engine = engine(MockLlmClient::with_texts(&["unused"]), store);
        let mut session = SessionTracker::new("claim-1");

        let err = engine
            .apply("claim-1", &mut session, "make it shorter", Tone::Formal)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptySession));
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_session_and_content_unchanged() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        store
            .update_claim_content(&record.id, ContentUpdate::now("Dear Sir/Madam,", None))
            .unwrap();
        let engine = engine(
            MockLlmClient::new(vec![Err(GenerationError::ApiError {
                status: 503,
                message: "Overloaded".to_string(),
            })]),
            store.clone(),
        );
        let mut session = seeded_session(&record.id, "Dear Sir/Madam,");
        let before = session.len();

        let err = engine
            .apply(&record.id, &mut session, "make it firmer", Tone::Firm)
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Generation(_)));
        assert_eq!(session.len(), before);
        let loaded = store.get_claim(&record.id).unwrap().unwrap();
        assert_eq!(loaded.generated_content.as_deref(), Some("Dear Sir/Madam,"));
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_revision() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let engine = engine(MockLlmClient::with_texts(&["Revised letter"]), store);
        // Session exists but the claim was never stored
        let mut session = seeded_session("ghost-claim", "Original letter");

        let outcome = engine
            .apply("ghost-claim", &mut session, "fix the date", Tone::Formal)
            .await
            .unwrap();

        assert_eq!(outcome.text, "Revised letter");
        assert!(!outcome.persisted);
        assert_eq!(session.latest_assistant_content(), Some("Revised letter"));
    }
}
