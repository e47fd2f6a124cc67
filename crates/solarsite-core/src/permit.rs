//! Permit form template, system-detail overrides, and permit packages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::fence::parse_fenced;
use crate::jurisdiction::JurisdictionRule;
use crate::scoring::{format_amount, serialize_amount};
use crate::CoreError;

/// A solar permit application.
///
/// [`PermitForm::default`] is the blank template; only its fields can be
/// overridden by [`SystemDetails`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitForm {
    pub applicant_name: String,
    pub property_address: String,
    pub jurisdiction: String,
    pub permit_type: String,
    pub system_size_kw: String,
    pub panel_count: String,
    pub inverter_type: String,
    pub installation_company: String,
    pub contractor_license: String,
    pub estimated_cost: String,
    pub requirements_checklist: Vec<String>,
    #[serde(serialize_with = "serialize_amount")]
    pub fees: f64,
    pub processing_time: String,
    pub submission_date: String,
    pub status: String,
}

impl Default for PermitForm {
    fn default() -> Self {
        Self {
            applicant_name: String::new(),
            property_address: String::new(),
            jurisdiction: String::new(),
            permit_type: String::new(),
            system_size_kw: String::new(),
            panel_count: String::new(),
            inverter_type: String::new(),
            installation_company: String::new(),
            contractor_license: String::new(),
            estimated_cost: String::new(),
            requirements_checklist: Vec::new(),
            fees: 0.0,
            processing_time: String::new(),
            submission_date: String::new(),
            status: "Draft".to_string(),
        }
    }
}

impl PermitForm {
    /// Fill the template from a jurisdiction's rules.
    pub fn from_rule(address: &str, rule: &JurisdictionRule, submission_date: &str) -> Self {
        Self {
            property_address: address.to_string(),
            jurisdiction: rule.jurisdiction_name.clone(),
            permit_type: rule.permit_type.clone(),
            requirements_checklist: rule.requirements.clone(),
            fees: rule.fees,
            processing_time: rule.processing_time.clone(),
            submission_date: submission_date.to_string(),
            ..Self::default()
        }
    }

    /// Shallow-merge overrides. Keys that are not template fields are
    /// dropped. Text fields take any non-null value (strings verbatim,
    /// anything else as compact JSON); `fees` takes any number.
    ///
    /// Returns the number of fields overwritten.
    pub fn apply_overrides(&mut self, details: &SystemDetails) -> usize {
        let mut applied = 0;
        for (key, value) in details.iter() {
            if self.set_field(key, value) {
                applied += 1;
            }
        }
        applied
    }

    fn set_field(&mut self, key: &str, value: &Value) -> bool {
        let slot = match key {
            "applicant_name" => &mut self.applicant_name,
            "property_address" => &mut self.property_address,
            "jurisdiction" => &mut self.jurisdiction,
            "permit_type" => &mut self.permit_type,
            "system_size_kw" => &mut self.system_size_kw,
            "panel_count" => &mut self.panel_count,
            "inverter_type" => &mut self.inverter_type,
            "installation_company" => &mut self.installation_company,
            "contractor_license" => &mut self.contractor_license,
            "estimated_cost" => &mut self.estimated_cost,
            "processing_time" => &mut self.processing_time,
            "submission_date" => &mut self.submission_date,
            "status" => &mut self.status,
            "fees" => {
                return match value.as_f64() {
                    Some(fees) => {
                        self.fees = fees;
                        true
                    }
                    None => unrepresentable(key, value, "expected a number"),
                };
            }
            "requirements_checklist" => {
                return match value.as_array() {
                    Some(items) => {
                        self.requirements_checklist = items.iter().map(value_text).collect();
                        true
                    }
                    None => unrepresentable(key, value, "expected an array"),
                };
            }
            _ => {
                debug!(key, "dropping unknown system detail");
                return false;
            }
        };
        if value.is_null() {
            return unrepresentable(key, value, "null cannot fill a text field");
        }
        *slot = value_text(value);
        true
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn unrepresentable(key: &str, value: &Value, reason: &str) -> bool {
    warn!(key, value = %value, reason, "skipping system detail the form cannot hold");
    false
}

/// User-supplied overrides for permit form fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemDetails(Map<String, Value>);

impl SystemDetails {
    /// The standard details attached to a permitting task.
    pub fn for_system(system_size: &str, panel_count: &str) -> Self {
        let mut map = Map::new();
        map.insert("system_size_kw".into(), system_size.into());
        map.insert("panel_count".into(), panel_count.into());
        map.insert("estimated_cost".into(), "$0".into());
        map.insert("inverter_type".into(), "Unknown".into());
        Self(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode details passed as text across an agent boundary.
    ///
    /// Blank text means no overrides.
    pub fn from_text(text: &str) -> Result<Self, CoreError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        match parse_fenced::<Value>(text)? {
            Value::Object(map) => Ok(Self(map)),
            other => Err(CoreError::SystemDetails(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn to_json_string(&self) -> String {
        Value::Object(self.0.clone()).to_string()
    }
}

/// Extract the jurisdiction rules from classifier output passed as text.
///
/// The payload must decode to an object with a `jurisdiction_info` entry.
pub fn rule_from_jurisdiction_text(text: &str) -> Result<JurisdictionRule, CoreError> {
    let payload: Value =
        parse_fenced(text).map_err(|e| CoreError::JurisdictionData(e.to_string()))?;
    let info = payload
        .get("jurisdiction_info")
        .ok_or_else(|| CoreError::JurisdictionData("missing `jurisdiction_info`".into()))?;
    JurisdictionRule::deserialize(info).map_err(|e| CoreError::JurisdictionData(e.to_string()))
}

/// A filled form plus submission guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitPackage {
    pub permit_form: PermitForm,
    pub jurisdiction_contact: String,
    pub next_steps: Vec<String>,
}

/// Build a permit package for an address under a jurisdiction's rules.
pub fn generate_permit_package(
    address: &str,
    rule: &JurisdictionRule,
    details: Option<&SystemDetails>,
    submission_date: &str,
) -> PermitPackage {
    let mut permit_form = PermitForm::from_rule(address, rule, submission_date);
    if let Some(details) = details {
        let applied = permit_form.apply_overrides(details);
        debug!(applied, "merged system details into permit form");
    }

    PermitPackage {
        permit_form,
        jurisdiction_contact: rule.contact.clone(),
        next_steps: vec![
            "Complete all required documents".to_string(),
            format!("Pay permit fee of ${}", format_amount(rule.fees)),
            "Submit application to jurisdiction".to_string(),
            format!("Wait {} for approval", rule.processing_time),
        ],
    }
}

/// Text-boundary variant: jurisdiction data and system details arrive as
/// (possibly fenced) JSON text.
///
/// Undecodable system details are logged and ignored; bad jurisdiction
/// data is an error.
pub fn generate_permit_package_from_text(
    address: &str,
    jurisdiction_data: &str,
    system_details: &str,
    submission_date: &str,
) -> Result<PermitPackage, CoreError> {
    let rule = rule_from_jurisdiction_text(jurisdiction_data)?;
    let details = match SystemDetails::from_text(system_details) {
        Ok(details) => details,
        Err(e) => {
            warn!(error = %e, "ignoring unusable system details");
            SystemDetails::default()
        }
    };
    Ok(generate_permit_package(
        address,
        &rule,
        Some(&details),
        submission_date,
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jurisdiction::{JurisdictionId, classify};

    const DATE: &str = "2024-07-18";

    #[test]
    fn template_defaults() {
        let form = PermitForm::default();
        assert_eq!(form.status, "Draft");
        assert_eq!(form.fees, 0.0);
        assert!(form.requirements_checklist.is_empty());
    }

    #[test]
    fn form_is_filled_from_rule() {
        let rule = JurisdictionId::SanFrancisco.rule();
        let pkg = generate_permit_package("1 Market St, San Francisco", rule, None, DATE);
        let form = &pkg.permit_form;
        assert_eq!(form.property_address, "1 Market St, San Francisco");
        assert_eq!(form.jurisdiction, "City of San Francisco");
        assert_eq!(form.permit_type, "Solar Photovoltaic System Permit");
        assert_eq!(form.fees, 750.0);
        assert_eq!(form.processing_time, "3-4 weeks");
        assert_eq!(form.submission_date, DATE);
        assert_eq!(form.requirements_checklist.len(), 5);
        assert_eq!(pkg.jurisdiction_contact, "sfdbi.org");
    }

    #[test]
    fn next_steps_mention_fee_and_time() {
        let rule = JurisdictionId::LosAngeles.rule();
        let pkg = generate_permit_package("LA", rule, None, DATE);
        assert_eq!(
            pkg.next_steps,
            vec![
                "Complete all required documents",
                "Pay permit fee of $500",
                "Submit application to jurisdiction",
                "Wait 4-6 weeks for approval",
            ]
        );
    }

    #[test]
    fn known_keys_override_and_unknown_keys_drop() {
        let mut details = SystemDetails::for_system("7kW", "24");
        details.insert("roof_pitch", "30deg");
        let mut form = PermitForm::default();
        let applied = form.apply_overrides(&details);
        assert_eq!(applied, 4);
        assert_eq!(form.system_size_kw, "7kW");
        assert_eq!(form.panel_count, "24");
        assert_eq!(form.estimated_cost, "$0");
        assert_eq!(form.inverter_type, "Unknown");
        let json = serde_json::to_value(&form).unwrap();
        assert!(json.get("roof_pitch").is_none());
    }

    #[test]
    fn overrides_can_replace_rule_fields() {
        let mut details = SystemDetails::default();
        details.insert("fees", 120);
        details.insert("status", "Submitted");
        let rule = JurisdictionId::LosAngeles.rule();
        let pkg = generate_permit_package("LA", rule, Some(&details), DATE);
        assert_eq!(pkg.permit_form.fees, 120.0);
        assert_eq!(pkg.permit_form.status, "Submitted");
        // Guidance still reflects the jurisdiction's schedule.
        assert_eq!(pkg.next_steps[1], "Pay permit fee of $500");
    }

    #[test]
    fn numeric_values_fill_text_fields() {
        let mut details = SystemDetails::default();
        details.insert("panel_count", 24);
        let mut form = PermitForm::default();
        form.apply_overrides(&details);
        assert_eq!(form.panel_count, "24");
    }

    #[test]
    fn fractional_fee_override_is_applied() {
        let details = SystemDetails::from_text(r#"{"fees": 612.5}"#).unwrap();
        let mut form = PermitForm::default();
        assert_eq!(form.apply_overrides(&details), 1);
        assert_eq!(form.fees, 612.5);
        assert_eq!(serde_json::to_value(&form).unwrap()["fees"], 612.5);
    }

    #[test]
    fn structured_values_fill_text_fields_as_json() {
        let details = SystemDetails::from_text(
            r#"{"inverter_type": {"make": "Enphase", "model": "IQ8"},
                "requirements_checklist": ["Site plan", 2, false]}"#,
        )
        .unwrap();
        let mut form = PermitForm::default();
        assert_eq!(form.apply_overrides(&details), 2);
        assert_eq!(form.inverter_type, r#"{"make":"Enphase","model":"IQ8"}"#);
        assert_eq!(form.requirements_checklist, vec!["Site plan", "2", "false"]);
    }

    #[test]
    fn values_the_form_cannot_hold_are_skipped() {
        let mut details = SystemDetails::default();
        details.insert("fees", "lots");
        details.insert("requirements_checklist", "one thing");
        details.insert("applicant_name", Value::Null);
        let mut form = PermitForm::default();
        assert_eq!(form.apply_overrides(&details), 0);
        assert_eq!(form, PermitForm::default());
    }

    #[test]
    fn from_text_accepts_classifier_output() {
        let text = serde_json::to_string(&classify("123 Main St, Los Angeles, CA")).unwrap();
        let pkg = generate_permit_package_from_text(
            "123 Main St, Los Angeles, CA",
            &format!("```json\n{text}\n```"),
            r#"{"system_size_kw": "5kW", "bogus": 1}"#,
            DATE,
        )
        .unwrap();
        assert_eq!(pkg.permit_form.jurisdiction, "City of Los Angeles");
        assert_eq!(pkg.permit_form.system_size_kw, "5kW");
    }

    #[test]
    fn from_text_accepts_fractional_jurisdiction_fees() {
        let data = r#"{
            "address": "9 Elm St, Fresno, CA",
            "classified_jurisdiction": "california_default",
            "jurisdiction_info": {
                "jurisdiction_name": "Fresno County",
                "permit_type": "Solar Installation Permit",
                "requirements": ["Site plan"],
                "fees": 500.0,
                "processing_time": "2-3 weeks",
                "contact": "fresno.gov"
            }
        }"#;
        let pkg = generate_permit_package_from_text("9 Elm St, Fresno, CA", data, "", DATE).unwrap();
        assert_eq!(pkg.permit_form.fees, 500.0);
        assert_eq!(pkg.next_steps[1], "Pay permit fee of $500");
        assert_eq!(serde_json::to_value(&pkg).unwrap()["permit_form"]["fees"], 500);

        let pricier = data.replace("500.0", "512.75");
        let pkg = generate_permit_package_from_text("x", &pricier, "", DATE).unwrap();
        assert_eq!(pkg.next_steps[1], "Pay permit fee of $512.75");
    }

    #[test]
    fn from_text_rejects_missing_jurisdiction_info() {
        let err = generate_permit_package_from_text("x", r#"{"address": "x"}"#, "", DATE)
            .unwrap_err();
        assert!(matches!(err, CoreError::JurisdictionData(_)));
    }

    #[test]
    fn from_text_rejects_garbage() {
        let err = generate_permit_package_from_text("x", "no json here", "", DATE).unwrap_err();
        assert!(matches!(err, CoreError::JurisdictionData(_)));
    }

    #[test]
    fn from_text_ignores_bad_details() {
        let text = serde_json::to_string(&classify("Anytown")).unwrap();
        let pkg = generate_permit_package_from_text("Anytown", &text, "[1, 2]", DATE).unwrap();
        assert_eq!(pkg.permit_form.system_size_kw, "");
        assert_eq!(pkg.permit_form.fees, 300.0);
    }

    #[test]
    fn system_details_json_text() {
        let details = SystemDetails::for_system("5kW", "20");
        let back = SystemDetails::from_text(&details.to_json_string()).unwrap();
        assert_eq!(back, details);
        assert!(SystemDetails::from_text("  ").unwrap().is_empty());
    }
}
