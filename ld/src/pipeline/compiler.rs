//! Template Compiler
//!
//! Fills letter templates and ad-hoc prompts with claim field values.
//! Substitution is purely textual and deterministic: the same (record,
//! template) pair always yields the same string, and missing fields degrade
//! to documented fallback literals instead of failing.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{ClaimRecord, TemplateDescriptor};

/// Literal substituted for an absent scalar field or unknown placeholder
pub const MISSING_FIELD: &str = "Unknown";

/// Literal substituted for an empty or absent list field
pub const EMPTY_LIST: &str = "None";

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder regex is valid"))
}

/// Render an optional scalar field
fn scalar(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => MISSING_FIELD.to_string(),
    }
}

/// Render a list field: comma-joined, or the empty-list literal
fn list(values: &[String]) -> String {
    if values.is_empty() {
        EMPTY_LIST.to_string()
    } else {
        values.join(", ")
    }
}

/// Map of placeholder name to rendered field value for one claim
fn field_map(record: &ClaimRecord) -> BTreeMap<&'static str, String> {
    let mut map = BTreeMap::new();
    map.insert("title", scalar(Some(&record.title)));
    map.insert("claim_type", scalar(record.claim_type.as_deref()));
    map.insert("claimant_name", scalar(record.claimant_name.as_deref()));
    map.insert("carrier_name", scalar(record.carrier_name.as_deref()));
    map.insert("policy_number", scalar(record.policy_number.as_deref()));
    map.insert("parties", list(&record.parties));
    map.insert(
        "witnesses",
        match &record.witnesses {
            Some(w) => list(w),
            None => EMPTY_LIST.to_string(),
        },
    );
    map.insert("incident_location", scalar(record.incident_location.as_deref()));
    map.insert("incident_date", scalar(record.incident_date.as_deref()));
    map.insert("incident_description", scalar(record.incident_description.as_deref()));
    map.insert("damages", scalar(record.damages.as_deref()));
    map.insert(
        "estimated_cost",
        match record.estimated_cost {
            Some(cost) => format!("${:.2}", cost),
            None => MISSING_FIELD.to_string(),
        },
    );
    map.insert(
        "police_report_filed",
        match record.police_report_filed {
            Some(true) => "Yes".to_string(),
            Some(false) => "No".to_string(),
            None => MISSING_FIELD.to_string(),
        },
    );
    map.insert("tone", record.effective_tone().name().to_string());
    map.insert("status", record.status.to_string());
    map.insert("attachments", list(&record.attachments));
    map
}

/// Fill an ad-hoc prompt string with claim field values
///
/// Every `{placeholder}` is substituted; placeholders naming no known field
/// render as the missing-field literal rather than being left unresolved.
pub fn compile_prompt(prompt: &str, record: &ClaimRecord) -> String {
    debug!(claim_id = %record.id, prompt_len = prompt.len(), "compile_prompt: called");
    let fields = field_map(record);
    placeholder_re()
        .replace_all(prompt, |caps: &regex::Captures<'_>| {
            fields
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| MISSING_FIELD.to_string())
        })
        .into_owned()
}

/// Fill a letter template with claim field values
pub fn compile(template: &TemplateDescriptor, record: &ClaimRecord) -> String {
    debug!(template_id = %template.id, claim_id = %record.id, "compile: called");
    compile_prompt(template.prompt, record)
}

/// Compiled plain-text listing of all claim fields
///
/// This is the claim data sent alongside the gap-check instruction and the
/// structured-intake drafting prompt. Field order is fixed.
pub fn claim_summary(record: &ClaimRecord) -> String {
    debug!(claim_id = %record.id, "claim_summary: called");
    compile_prompt(
        "Title: {title}\n\
         Claim type: {claim_type}\n\
         Claimant: {claimant_name}\n\
         Carrier: {carrier_name}\n\
         Policy number: {policy_number}\n\
         Incident date: {incident_date}\n\
         Incident location: {incident_location}\n\
         Incident description: {incident_description}\n\
         Parties involved: {parties}\n\
         Witnesses: {witnesses}\n\
         Damages: {damages}\n\
         Estimated cost: {estimated_cost}\n\
         Police report filed: {police_report_filed}\n\
         Preferred tone: {tone}",
        record,
    )
}
