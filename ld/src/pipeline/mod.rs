//! Claim drafting and iterative refinement pipeline
//!
//! Control flow: intake data -> template compiler -> (optionally) gap
//! detector -> draft generator -> session tracker -> zero or more
//! correction turns, each appending to the session and persisting through
//! the claim gateway.
//!
//! Failure semantics: a generation failure aborts the operation with
//! nothing appended or persisted. A persistence failure after successful
//! generation still returns the text, flagged unpersisted.

use thiserror::Error;

pub mod compiler;
mod correct;
mod draft;
mod gaps;
mod gateway;

pub use compiler::{EMPTY_LIST, MISSING_FIELD, claim_summary, compile, compile_prompt};
pub use correct::CorrectionEngine;
pub use draft::DraftGenerator;
pub use gaps::{GapDetector, GapQuestion, MIN_QUESTION_LEN, SUFFICIENCY_MARKER, parse_gap_response};
pub use gateway::{ClaimGateway, ContentUpdate};

use crate::llm::GenerationError;

/// Result of an accepted draft or correction turn
#[derive(Debug, Clone)]
pub struct DraftOutcome {
    /// The produced letter text
    pub text: String,
    /// Whether the text was saved to the claims store
    ///
    /// False means the caller got a usable draft that could not be saved;
    /// the UI should show the text and warn about the failed save.
    pub persisted: bool,
}

/// Errors from pipeline operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The external generation call failed or returned an unusable payload
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// A correction was requested with no draft in the session
    #[error("No draft available to revise in this session")]
    EmptySession,

    /// The claim record does not exist in the store
    #[error("Claim not found: {0}")]
    ClaimNotFound(String),
}
