//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, GenerationError};

/// Stateless generation service client - each call is independent
///
/// This is the seam between the drafting pipeline and the external
/// natural-language generation service. Each completion request is a
/// single-flight call: the full conversation context travels with the
/// request and no state is held between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send one completion request and wait for the result
    ///
    /// Any transport failure, non-success status, or unusable payload is
    /// returned as a [`GenerationError`]. The client never retries.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, GenerationError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing::debug;

    use crate::llm::{StopReason, TokenUsage};

    /// Mock generation client for unit tests - replays queued results and
    /// records the requests it receives
    pub struct MockLlmClient {
        responses: Mutex<VecDeque<Result<CompletionResponse, GenerationError>>>,
        requests: Mutex<Vec<CompletionRequest>>,
        call_count: AtomicUsize,
    }

    impl MockLlmClient {
        pub fn new(responses: Vec<Result<CompletionResponse, GenerationError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }
        }

        /// Convenience constructor for a sequence of successful text replies
        pub fn with_texts(texts: &[&str]) -> Self {
            Self::new(texts.iter().map(|t| Ok(text_response(t))).collect())
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        /// Requests received so far, oldest first
        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().expect("mock request log poisoned").clone()
        }
    }

    /// Build a plain text completion response
    pub fn text_response(text: &str) -> CompletionResponse {
        CompletionResponse {
            content: Some(text.to_string()),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }

    #[async_trait]
    impl LlmClient for MockLlmClient {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, GenerationError> {
            let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
            debug!(%idx, "MockLlmClient::complete: called");
            self.requests.lock().expect("mock request log poisoned").push(request);
            self.responses
                .lock()
                .expect("mock response queue poisoned")
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::InvalidResponse("No more mock responses".to_string())))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn request() -> CompletionRequest {
            CompletionRequest {
                system_prompt: "Test".to_string(),
                messages: vec![],
                temperature: 0.0,
                max_tokens: 100,
            }
        }

        #[tokio::test]
        async fn test_mock_client_returns_responses_in_order() {
            let client = MockLlmClient::with_texts(&["Response 1", "Response 2"]);

            let resp1 = client.complete(request()).await.unwrap();
            assert_eq!(resp1.content.as_deref(), Some("Response 1"));

            let resp2 = client.complete(request()).await.unwrap();
            assert_eq!(resp2.content.as_deref(), Some("Response 2"));

            assert_eq!(client.call_count(), 2);
        }

        #[tokio::test]
        async fn test_mock_client_replays_errors() {
            let client = MockLlmClient::new(vec![Err(GenerationError::ApiError {
                status: 500,
                message: "Internal server error".to_string(),
            })]);

            let err = client.complete(request()).await.unwrap_err();
            assert!(matches!(err, GenerationError::ApiError { status: 500, .. }));
        }

        #[tokio::test]
        async fn test_mock_client_errors_when_exhausted() {
            let client = MockLlmClient::new(vec![]);
            assert!(client.complete(request()).await.is_err());
        }
    }
}
