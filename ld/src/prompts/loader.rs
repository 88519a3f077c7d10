//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;
use crate::domain::Tone;

/// Context for rendering prompt templates
#[derive(Debug, Clone, Default, Serialize)]
pub struct PromptContext {
    /// Letter tone name
    pub tone: String,
    /// Compiled claim data summary
    pub claim: String,
}

impl PromptContext {
    /// Context for tone-bearing system prompts
    pub fn for_tone(tone: Tone) -> Self {
        Self {
            tone: tone.name().to_string(),
            claim: String::new(),
        }
    }

    /// Context for the structured-intake letter prompt
    pub fn for_intake(claim_summary: impl Into<String>) -> Self {
        Self {
            tone: String::new(),
            claim: claim_summary.into(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.letterdraft/prompts/`)
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the given working directory
    ///
    /// Prompts in `{root}/.letterdraft/prompts/{name}.pmt` override the
    /// embedded defaults.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let user_dir = root.as_ref().join(".letterdraft/prompts");
        let user_dir_exists = user_dir.exists();
        debug!(?user_dir, %user_dir_exists, "PromptLoader::new: called");

        Self {
            hbs: Handlebars::new(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        Self {
            hbs: Handlebars::new(),
            user_dir: None,
        }
    }

    /// Load a template by name
    ///
    /// Checks the user override directory first, then the embedded set.
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// System prompt for initial drafting in the given tone
    pub fn draft_system(&self, tone: Tone) -> Result<String> {
        self.render("draft-system", &PromptContext::for_tone(tone))
    }

    /// User prompt wrapping compiled claim data (no-template path)
    pub fn intake_letter(&self, claim_summary: &str) -> Result<String> {
        self.render("intake-letter", &PromptContext::for_intake(claim_summary))
    }

    /// Fixed system prompt for the completeness gap check
    pub fn gap_system(&self) -> Result<String> {
        self.load_template("gap-system")
    }

    /// System prompt for correction turns in the given tone
    pub fn correction_system(&self, tone: Tone) -> Result<String> {
        self.render("correction-system", &PromptContext::for_tone(tone))
    }
}
