//! Persistence gateway boundary
//!
//! The pipeline reads claim records from, and writes accepted drafts back
//! to, the claims store through this trait. The store's write is a single
//! atomic record update; concurrent writers follow last-write-wins.

use chrono::{DateTime, Utc};
use claimstore::{ClaimStore, StoreError};
use serde_json::json;
use tracing::debug;

use crate::domain::{ClaimRecord, ClaimStatus};

/// Fields written back to a claim when a draft or correction is accepted
#[derive(Debug, Clone)]
pub struct ContentUpdate {
    /// The accepted letter text
    pub generated_content: String,
    /// Template id used, when the template path produced the letter
    pub template_used: Option<String>,
    /// Write timestamp
    pub updated_at: DateTime<Utc>,
}

impl ContentUpdate {
    /// Build an update stamped with the current time
    pub fn now(generated_content: impl Into<String>, template_used: Option<String>) -> Self {
        Self {
            generated_content: generated_content.into(),
            template_used,
            updated_at: Utc::now(),
        }
    }
}

/// Boundary to the claims store
///
/// Implementations must make `update_claim_content` a single atomic record
/// update; the pipeline performs no coordination beyond that.
pub trait ClaimGateway: Send + Sync {
    /// Fetch a claim record by id
    fn get_claim(&self, id: &str) -> Result<Option<ClaimRecord>, StoreError>;

    /// Write accepted letter content back to a claim
    ///
    /// Overwrites the stored generated content (history lives only in the
    /// session tracker) and advances the claim status to drafted.
    fn update_claim_content(&self, id: &str, update: ContentUpdate) -> Result<(), StoreError>;
}

impl ClaimGateway for ClaimStore {
    fn get_claim(&self, id: &str) -> Result<Option<ClaimRecord>, StoreError> {
        debug!(%id, "ClaimGateway::get_claim: called");
        match self.get(id)? {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    fn update_claim_content(&self, id: &str, update: ContentUpdate) -> Result<(), StoreError> {
        debug!(%id, template_used = ?update.template_used, "ClaimGateway::update_claim_content: called");
        let mut patch = json!({
            "generated_content": update.generated_content,
            "status": ClaimStatus::Drafted,
            "updated_at": update.updated_at,
        });
        // Corrections pass no template; keep whatever produced the lineage
        if let Some(template_id) = update.template_used {
            patch["template_used"] = json!(template_id);
        }
        self.merge(id, &patch)
    }
}
