//! Letter template descriptors
//!
//! Templates are parameterized prompt blueprints with single-brace
//! `{field}` placeholders, filled in by the template compiler. They are
//! defined by the application and consumed read-only.

use tracing::debug;

/// A named, parameterized prompt blueprint for one letter style
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDescriptor {
    /// Stable template id (recorded on the claim when used)
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Prompt with `{field}` placeholders
    pub prompt: &'static str,
}

/// General-purpose first-party claim letter
pub const GENERAL: TemplateDescriptor = TemplateDescriptor {
    id: "general",
    name: "General claim letter",
    prompt: "Write an insurance claim letter to {carrier_name} regarding a {claim_type} claim \
             filed by {claimant_name} under policy number {policy_number}. The incident occurred \
             on {incident_date} at {incident_location}. What happened: {incident_description}. \
             Parties involved: {parties}. Witnesses: {witnesses}. Damages suffered: {damages}. \
             Estimated cost of damages: {estimated_cost}. A police report was filed: \
             {police_report_filed}. Close by requesting a prompt review and written response.",
};

/// Auto accident claim letter
pub const AUTO_ACCIDENT: TemplateDescriptor = TemplateDescriptor {
    id: "auto-accident",
    name: "Auto accident claim letter",
    prompt: "Write a claim letter to {carrier_name} about a motor vehicle accident on \
             {incident_date} at {incident_location}, filed by {claimant_name} under policy \
             {policy_number}. Describe the collision: {incident_description}. Drivers and \
             passengers involved: {parties}. Witnesses: {witnesses}. Vehicle and other damages: \
             {damages}, estimated at {estimated_cost}. Police report filed: \
             {police_report_filed}. Request an adjuster inspection and claim number assignment.",
};

/// Property damage claim letter
pub const PROPERTY_DAMAGE: TemplateDescriptor = TemplateDescriptor {
    id: "property-damage",
    name: "Property damage claim letter",
    prompt: "Write a property damage claim letter to {carrier_name} for {claimant_name}, policy \
             {policy_number}. The damage occurred on {incident_date} at {incident_location}. \
             Cause and extent of damage: {incident_description}. Damaged items: {damages}, with \
             an estimated repair or replacement cost of {estimated_cost}. Witnesses: {witnesses}. \
             Request coverage confirmation and next steps for assessment.",
};

/// All builtin templates, in display order
pub const BUILTIN_TEMPLATES: &[TemplateDescriptor] = &[GENERAL, AUTO_ACCIDENT, PROPERTY_DAMAGE];

/// Look up a builtin template by id
pub fn find_template(id: &str) -> Option<&'static TemplateDescriptor> {
    debug!(%id, "find_template: called");
    BUILTIN_TEMPLATES.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_template() {
        assert_eq!(find_template("general").unwrap().name, "General claim letter");
        assert_eq!(find_template("auto-accident").unwrap().id, "auto-accident");
        assert!(find_template("marine-cargo").is_none());
    }

    #[test]
    fn test_builtin_templates_have_placeholders() {
        for template in BUILTIN_TEMPLATES {
            assert!(template.prompt.contains("{carrier_name}"), "{} missing carrier", template.id);
            assert!(template.prompt.contains('{'), "{} has no placeholders", template.id);
        }
    }
}
