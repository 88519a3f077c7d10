//! Draft Generator
//!
//! Turns a compiled prompt into the initial letter draft, seeds the
//! drafting session, and persists the accepted draft through the gateway.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::GenerationConfig;
use crate::domain::{ClaimRecord, GenerationTurn, SessionTracker, TemplateDescriptor};
use crate::llm::{CompletionRequest, GenerationError, LlmClient, Message};
use crate::pipeline::compiler;
use crate::pipeline::gateway::{ClaimGateway, ContentUpdate};
use crate::pipeline::{DraftOutcome, PipelineError};
use crate::prompts::PromptLoader;

/// Produces the initial letter draft for a claim
pub struct DraftGenerator {
    llm: Arc<dyn LlmClient>,
    gateway: Arc<dyn ClaimGateway>,
    prompts: Arc<PromptLoader>,
    intake_temperature: f32,
    template_temperature: f32,
    max_tokens: u32,
}

impl DraftGenerator {
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
            intake_temperature: config.intake_temperature,
            template_temperature: config.template_temperature,
            max_tokens: config.draft_max_tokens,
        }
    }

    /// Generate a draft letter for a claim
    ///
    /// With a template, the compiled template is the prompt and sampling
    /// runs warmer for narrative variety; without one, the fixed intake
    /// instruction wraps the compiled claim summary at a lower temperature.
    ///
    /// On success the session is seeded with the request and response
    /// turns, then the draft is persisted. A persistence failure does not
    /// invalidate the draft: the text comes back flagged `persisted: false`.
    /// On a generation failure the session and store are left untouched.
    pub async fn generate(
        &self,
        record: &ClaimRecord,
        template: Option<&TemplateDescriptor>,
        session: &mut SessionTracker,
    ) -> Result<DraftOutcome, PipelineError> {
        debug!(claim_id = %record.id, template_id = ?template.map(|t| t.id), "DraftGenerator::generate: called");
        let tone = record.effective_tone();
        let system_prompt = self
            .prompts
            .draft_system(tone)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let (user_prompt, temperature) = match template {
            Some(t) => (compiler::compile(t, record), self.template_temperature),
            None => {
                let summary = compiler::claim_summary(record);
                let prompt = self
                    .prompts
                    .intake_letter(&summary)
                    .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
                (prompt, self.intake_temperature)
            }
        };

        let request = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(user_prompt.clone())],
            temperature,
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await.map_err(PipelineError::Generation)?;
        let usage = response.usage;
        let text = response.into_text().map_err(PipelineError::Generation)?;
        info!(
            claim_id = %record.id,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Draft generated"
        );

        session.append(GenerationTurn::request(user_prompt));
        session.append(GenerationTurn::response(text.clone()));

        let update = ContentUpdate::now(text.clone(), template.map(|t| t.id.to_string()));
        let persisted = match self.gateway.update_claim_content(&record.id, update) {
            Ok(()) => true,
            Err(e) => {
                warn!(claim_id = %record.id, error = %e, "Draft produced but not saved");
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

    use crate::domain::find_template;
    use crate::llm::client::mock::MockLlmClient;

    fn generator(client: MockLlmClient, store: Arc<ClaimStore>) -> DraftGenerator {
        DraftGenerator::new(
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

    #[tokio::test]
    async fn test_generate_seeds_session_and_persists() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let generator = generator(MockLlmClient::with_texts(&["Dear Claims Department,"]), store.clone());
        let mut session = SessionTracker::new(&record.id);

        let outcome = generator.generate(&record, None, &mut session).await.unwrap();

        assert_eq!(outcome.text, "Dear Claims Department,");
        assert!(outcome.persisted);
        assert_eq!(session.len(), 2);
        assert_eq!(session.latest_assistant_content(), Some("Dear Claims Department,"));

        let loaded = store.get_claim(&record.id).unwrap().unwrap();
        assert_eq!(loaded.generated_content.as_deref(), Some("Dear Claims Department,"));
    }

    #[tokio::test]
    async fn test_generate_with_template_records_template_id() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let generator = generator(MockLlmClient::with_texts(&["Dear Acme Mutual,"]), store.clone());
        let mut session = SessionTracker::new(&record.id);
        let template = find_template("auto-accident").unwrap();

        let outcome = generator.generate(&record, Some(template), &mut session).await.unwrap();

        assert!(outcome.persisted);
        let loaded = store.get_claim(&record.id).unwrap().unwrap();
        assert_eq!(loaded.template_used.as_deref(), Some("auto-accident"));
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_session_and_store_untouched() {
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = stored_claim(&store);
        let generator = generator(
            MockLlmClient::new(vec![Err(GenerationError::ApiError {
                status: 500,
                message: "Internal server error".to_string(),
            })]),
            store.clone(),
        );
        let mut session = SessionTracker::new(&record.id);

        let err = generator.generate(&record, None, &mut session).await.unwrap_err();

        assert!(matches!(err, PipelineError::Generation(GenerationError::ApiError { status: 500, .. })));
        assert!(session.is_empty());
        let loaded = store.get_claim(&record.id).unwrap().unwrap();
        assert!(loaded.generated_content.is_none());
    }

    #[tokio::test]
    async fn test_persistence_failure_still_returns_text() {
        // Claim is not in the store, so the content write fails
        let store = Arc::new(ClaimStore::open_in_memory().unwrap());
        let record = ClaimRecord::new_intake("Unsaved claim");
        let generator = generator(MockLlmClient::with_texts(&["Dear Claims Department,"]), store);
        let mut session = SessionTracker::new(&record.id);

        let outcome = generator.generate(&record, None, &mut session).await.unwrap();

        assert_eq!(outcome.text, "Dear Claims Department,");
        assert!(!outcome.persisted);
        // The session still carries the draft for the caller
        assert_eq!(session.latest_assistant_content(), Some("Dear Claims Department,"));
    }
}
