//! Claim record domain types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// Letter tone preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Formal,
    Empathetic,
    Firm,
    Neutral,
}

impl Tone {
    /// Display name used inside generated system prompts
    pub fn name(&self) -> &'static str {
        match self {
            Self::Formal => "formal",
            Self::Empathetic => "empathetic",
            Self::Firm => "firm",
            Self::Neutral => "neutral",
        }
    }
}

impl std::fmt::Display for Tone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "Tone::from_str: called");
        match s.to_lowercase().as_str() {
            "formal" => Ok(Self::Formal),
            "empathetic" => Ok(Self::Empathetic),
            "firm" => Ok(Self::Firm),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("Unknown tone: '{}'. Supported: formal, empathetic, firm, neutral", other)),
        }
    }
}

/// Drafting status of a claim
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClaimStatus {
    /// Intake submitted, no letter drafted yet
    #[default]
    Intake,
    /// A generated letter has been persisted
    Drafted,
    /// Letter sent to the carrier
    Submitted,
}

impl std::fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Intake => write!(f, "intake"),
            Self::Drafted => write!(f, "drafted"),
            Self::Submitted => write!(f, "submitted"),
        }
    }
}

/// Structured representation of one insurance incident and its drafting state
///
/// Created from intake submission, mutated by edits and by the pipeline when
/// it writes generated content. The pipeline never deletes records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClaimRecord {
    /// Unique claim id
    pub id: String,

    /// Short human-readable title
    pub title: String,

    /// Kind of claim (auto, property, health, ...)
    pub claim_type: Option<String>,

    /// Person filing the claim
    pub claimant_name: Option<String>,

    /// Insurance carrier the letter is addressed to
    pub carrier_name: Option<String>,

    /// Policy number with the carrier
    pub policy_number: Option<String>,

    /// Parties involved in the incident
    pub parties: Vec<String>,

    /// Witnesses, if any were recorded at intake
    pub witnesses: Option<Vec<String>>,

    /// Where the incident happened
    pub incident_location: Option<String>,

    /// When the incident happened
    pub incident_date: Option<String>,

    /// Free-text narrative of what happened
    pub incident_description: Option<String>,

    /// Description of the damages suffered
    pub damages: Option<String>,

    /// Estimated cost of the damages in USD
    pub estimated_cost: Option<f64>,

    /// Whether a police report was filed
    pub police_report_filed: Option<bool>,

    /// Preferred letter tone
    pub tone: Option<Tone>,

    /// References to uploaded supporting documents
    pub attachments: Vec<String>,

    /// Drafting status
    pub status: ClaimStatus,

    /// Most recently persisted generated letter, if any
    pub generated_content: Option<String>,

    /// Template id used for the persisted letter, if one was used
    pub template_used: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Default for ClaimRecord {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: String::new(),
            title: String::new(),
            claim_type: None,
            claimant_name: None,
            carrier_name: None,
            policy_number: None,
            parties: Vec::new(),
            witnesses: None,
            incident_location: None,
            incident_date: None,
            incident_description: None,
            damages: None,
            estimated_cost: None,
            police_report_filed: None,
            tone: None,
            attachments: Vec::new(),
            status: ClaimStatus::Intake,
            generated_content: None,
            template_used: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl ClaimRecord {
    /// Create a new record from intake data, assigning a fresh id
    pub fn new_intake(title: impl Into<String>) -> Self {
        let title = title.into();
        debug!(%title, "ClaimRecord::new_intake: called");
        Self {
            id: Uuid::now_v7().to_string(),
            title,
            ..Default::default()
        }
    }

    /// Tone to draft with, falling back to the default
    pub fn effective_tone(&self) -> Tone {
        self.tone.unwrap_or_default()
    }
}
