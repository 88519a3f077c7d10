//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for OpenAI's Chat Completions API.
//! Always reads the first candidate choice; never retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, GenerationError, LlmClient, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, GenerationError> {
        debug!(model = %config.model, "OpenAIClient::from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        let http = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(GenerationError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
        })
    }

    /// Build the request body for the Chat Completions API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.temperature, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        for msg in &request.messages {
            messages.push(serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            }));
        }

        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens.min(self.max_tokens),
        })
    }

    /// Parse the Chat Completions response, reading the first choice
    fn parse_response(&self, api_response: OpenAIResponse) -> Result<CompletionResponse, GenerationError> {
        debug!(choice_count = api_response.choices.len(), "parse_response: called");
        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GenerationError::InvalidResponse("Empty choice list in response".to_string()))?;

        let stop_reason = choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_openai)
            .unwrap_or(StopReason::EndTurn);

        Ok(CompletionResponse {
            content: choice.message.content,
            stop_reason,
            usage: TokenUsage {
                input_tokens: api_response.usage.prompt_tokens,
                output_tokens: api_response.usage.completion_tokens,
            },
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, GenerationError> {
        debug!(%self.model, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(GenerationError::Network)?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(%status, "complete: API error");
            return Err(GenerationError::ApiError { status, message });
        }

        let api_response: OpenAIResponse = response.json().await.map_err(GenerationError::Network)?;
        self.parse_response(api_response)
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: OpenAIUsage,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn test_client() -> OpenAIClient {
        OpenAIClient {
            model: "gpt-4o-mini".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens: 2048,
        }
    }

    #[test]
    fn test_build_request_body_prepends_system_message() {
        let client = test_client();
        let request = CompletionRequest {
            system_prompt: "You are a claims correspondent".to_string(),
            messages: vec![Message::user("Draft the letter")],
            temperature: 0.5,
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 0.5);
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Draft the letter");
    }

    #[test]
    fn test_max_tokens_capped_at_client_limit() {
        let client = test_client();
        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            temperature: 0.0,
            max_tokens: 99999,
        };

        let body = client.build_request_body(&request);
        assert_eq!(body["max_tokens"], 2048);
    }

    #[test]
    fn test_parse_response_reads_first_choice() {
        let client = test_client();
        let api_response: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [
                { "message": { "content": "Dear Sir or Madam," }, "finish_reason": "stop" },
                { "message": { "content": "Second candidate" }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 120, "completion_tokens": 80 }
        }))
        .unwrap();

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content.as_deref(), Some("Dear Sir or Madam,"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 120);
    }

    #[test]
    fn test_parse_response_empty_choices_is_invalid() {
        let client = test_client();
        let api_response: OpenAIResponse = serde_json::from_value(serde_json::json!({
            "choices": [],
            "usage": {}
        }))
        .unwrap();

        let err = client.parse_response(api_response).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidResponse(_)));
    }
}
