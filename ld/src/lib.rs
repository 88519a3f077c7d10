//! LetterDraft - claim letter drafting and iterative refinement pipeline
//!
//! Turns structured claim intake data into a formal claim letter using an
//! external natural-language generation service, optionally gates
//! generation behind a completeness check, and supports conversational,
//! turn-by-turn revision of the resulting letter.
//!
//! # Core Concepts
//!
//! - **Single-flight calls**: every operation is one request/response call
//!   to the generation service; no background work, no internal retries
//! - **Session history in memory, content in the store**: the turn log
//!   lives for the editing session; only the accepted letter is persisted
//! - **Generation failures abort cleanly**: a failed call never appends a
//!   turn or persists partial content
//!
//! # Modules
//!
//! - [`llm`] - generation service clients behind the LlmClient trait
//! - [`pipeline`] - compiler, gap detector, draft generator, correction engine
//! - [`domain`] - claim records, templates, drafting sessions
//! - [`prompts`] - Handlebars system-prompt templates
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod llm;
pub mod pipeline;
pub mod prompts;

// Re-export commonly used types
pub use config::{Config, GenerationConfig, LlmConfig, StorageConfig};
pub use domain::{BUILTIN_TEMPLATES, ClaimRecord, ClaimStatus, GenerationTurn, SessionTracker, TemplateDescriptor, Tone, TurnRole, find_template};
pub use llm::{AnthropicClient, CompletionRequest, CompletionResponse, GenerationError, LlmClient, OpenAIClient, create_client};
pub use pipeline::{
    ClaimGateway, ContentUpdate, CorrectionEngine, DraftGenerator, DraftOutcome, GapDetector, GapQuestion,
    PipelineError, claim_summary, compile, compile_prompt,
};
pub use prompts::{PromptContext, PromptLoader};
