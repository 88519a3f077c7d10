//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for the drafting
//! pipeline's system prompts.
//!
//! Template loading chain:
//! 1. `.letterdraft/prompts/{name}.pmt` (user override)
//! 2. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution. Letter
//! templates shown to end users are a separate mechanism (see the template
//! compiler) and use single-brace placeholders.

pub mod embedded;
mod loader;

pub use loader::{PromptContext, PromptLoader};
