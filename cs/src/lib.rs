//! ClaimStore - persisted claim record store
//!
//! Backs the LetterDraft pipeline's persistence gateway with a small
//! SQLite-backed JSON document store. Each claim record is one document;
//! updates replace or merge the whole document atomically.
//!
//! # Example
//!
//! ```ignore
//! use claimstore::ClaimStore;
//!
//! let store = ClaimStore::open(".claimstore/claims.db")?;
//! store.put("claim-1", &serde_json::json!({ "title": "Hail damage" }))?;
//! store.merge("claim-1", &serde_json::json!({ "status": "drafted" }))?;
//! let doc = store.get("claim-1")?;
//! ```

pub mod cli;
pub mod config;
mod store;

pub use store::{ClaimId, ClaimStore, ClaimSummary, StoreError};
