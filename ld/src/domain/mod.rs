//! Domain types for claim drafting

mod claim;
mod session;
mod template;

pub use claim::{ClaimRecord, ClaimStatus, Tone};
pub use session::{GenerationTurn, SessionTracker, TurnRole};
pub use template::{BUILTIN_TEMPLATES, TemplateDescriptor, find_template};
