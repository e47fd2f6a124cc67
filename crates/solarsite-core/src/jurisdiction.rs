//! Static jurisdiction rule table and address classification.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Known permitting jurisdictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionId {
    LosAngeles,
    SanFrancisco,
    CaliforniaDefault,
}

impl JurisdictionId {
    pub const ALL: [JurisdictionId; 3] = [
        JurisdictionId::LosAngeles,
        JurisdictionId::SanFrancisco,
        JurisdictionId::CaliforniaDefault,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LosAngeles => "los_angeles",
            Self::SanFrancisco => "san_francisco",
            Self::CaliforniaDefault => "california_default",
        }
    }

    /// Match an address by case-folded substring.
    ///
    /// Bare tokens like `"la"` also match inside other words ("Oakland").
    pub fn from_address(address: &str) -> Self {
        let lower = address.to_lowercase();
        if lower.contains("los angeles") || lower.contains("la") {
            Self::LosAngeles
        } else if lower.contains("san francisco") || lower.contains("sf") {
            Self::SanFrancisco
        } else {
            Self::CaliforniaDefault
        }
    }

    /// Location phrase appended to research queries.
    pub fn research_location(&self) -> &'static str {
        match self {
            Self::LosAngeles => "Los Angeles California",
            Self::SanFrancisco => "San Francisco California",
            Self::CaliforniaDefault => "California",
        }
    }

    pub fn rule(&self) -> &'static JurisdictionRule {
        let idx = match self {
            Self::LosAngeles => 0,
            Self::SanFrancisco => 1,
            Self::CaliforniaDefault => 2,
        };
        &RULES[idx]
    }
}

impl fmt::Display for JurisdictionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permitting rules for one jurisdiction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRule {
    pub jurisdiction_name: String,
    pub permit_type: String,
    pub requirements: Vec<String>,
    #[serde(serialize_with = "crate::scoring::serialize_amount")]
    pub fees: f64,
    /// Free-text range, e.g. `"4-6 weeks"`.
    pub processing_time: String,
    pub contact: String,
}

fn rule(
    name: &str,
    permit_type: &str,
    requirements: &[&str],
    fees: f64,
    processing_time: &str,
    contact: &str,
) -> JurisdictionRule {
    JurisdictionRule {
        jurisdiction_name: name.into(),
        permit_type: permit_type.into(),
        requirements: requirements.iter().map(|s| s.to_string()).collect(),
        fees,
        processing_time: processing_time.into(),
        contact: contact.into(),
    }
}

// Indexed in `JurisdictionId::ALL` order.
static RULES: LazyLock<[JurisdictionRule; 3]> = LazyLock::new(|| {
    [
        rule(
            "City of Los Angeles",
            "Solar Installation Permit",
            &[
                "Site plan with solar array layout",
                "Electrical single-line diagram",
                "Structural calculations",
                "Interconnection application",
                "LADBS permit application",
            ],
            500.0,
            "4-6 weeks",
            "ladbs.lacity.org",
        ),
        rule(
            "City of San Francisco",
            "Solar Photovoltaic System Permit",
            &[
                "Solar system plans and specifications",
                "Electrical permit application",
                "Building permit (if roof modifications)",
                "Fire department clearance form",
                "Utility interconnection agreement",
            ],
            750.0,
            "3-4 weeks",
            "sfdbi.org",
        ),
        rule(
            "California County (Generic)",
            "Residential Solar Permit",
            &[
                "Solar system design plans",
                "Electrical diagram",
                "Building department application",
                "Utility notification form",
            ],
            300.0,
            "2-4 weeks",
            "Local building department",
        ),
    ]
});

/// Output of the classifier, and the payload handed to form generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub address: String,
    pub classified_jurisdiction: JurisdictionId,
    pub jurisdiction_info: JurisdictionRule,
}

/// Classify an address. Total: every input maps to one of the known ids.
pub fn classify(address: &str) -> Classification {
    let id = JurisdictionId::from_address(address);
    Classification {
        address: address.to_string(),
        classified_jurisdiction: id,
        jurisdiction_info: id.rule().clone(),
    }
}

/// Coarse research location for an address, bucketed like [`classify`].
pub fn location_for(address: &str) -> &'static str {
    JurisdictionId::from_address(address).research_location()
}
