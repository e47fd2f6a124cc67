//! Heuristic feasibility scoring.
//!
//! The constants and thresholds are fixed; changing them changes every
//! published decision.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use tracing::warn;

pub const DEFAULT_FEES: f64 = 500.0;
pub const DEFAULT_PROCESSING_WEEKS: i64 = 4;
const DEFAULT_PROCESSING_TIME: &str = "4 weeks";
/// Score assigned when a component cannot be computed.
pub const FALLBACK_SCORE: f64 = 60.0;

const PERMIT_WEIGHT: f64 = 0.6;
const RESEARCH_WEIGHT: f64 = 0.4;
const GO_THRESHOLD: f64 = 70.0;
const CONDITIONAL_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "CONDITIONAL GO")]
    ConditionalGo,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl Decision {
    /// Threshold an overall score: `>= 70` GO, `>= 50` CONDITIONAL GO.
    pub fn from_score(overall: f64) -> Self {
        if overall >= GO_THRESHOLD {
            Self::Go
        } else if overall >= CONDITIONAL_THRESHOLD {
            Self::ConditionalGo
        } else {
            Self::NoGo
        }
    }

    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Self::Go => RiskLevel::Low,
            Self::ConditionalGo => RiskLevel::Medium,
            Self::NoGo => RiskLevel::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::ConditionalGo => "CONDITIONAL GO",
            Self::NoGo => "NO-GO",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a component score came from its formula or from the flat
/// fallback. Both can produce 60.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum ScoreBasis {
    Computed,
    Fallback { reason: String },
}

impl ScoreBasis {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityResult {
    pub overall_score: f64,
    pub decision: Decision,
    pub risk_level: RiskLevel,
    pub permit_score: f64,
    pub research_score: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub fees: f64,
    pub processing_weeks: i64,
    pub permit_basis: ScoreBasis,
    pub research_basis: ScoreBasis,
}

/// `max(0, 100 - fees/10 - weeks*5)`.
pub fn permit_score(fees: f64, processing_weeks: i64) -> f64 {
    (100.0 - fees / 10.0 - processing_weeks as f64 * 5.0).max(0.0)
}

/// `70 - 2*articles`, clamped to `[20, 80]`.
pub fn research_score(total_articles: f64) -> f64 {
    (70.0 - total_articles * 2.0).clamp(20.0, 80.0)
}

pub fn overall_score(permit_score: f64, research_score: f64) -> f64 {
    permit_score * PERMIT_WEIGHT + research_score * RESEARCH_WEIGHT
}

/// Round half away from zero to one decimal.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Render a fee the way reports print it: `500`, `612.5`.
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

pub(crate) fn serialize_amount<S: Serializer>(amount: &f64, s: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        s.serialize_i64(*amount as i64)
    } else {
        s.serialize_f64(*amount)
    }
}

struct PermitComponent {
    score: f64,
    basis: ScoreBasis,
    fees: f64,
    processing_weeks: i64,
}

impl PermitComponent {
    fn computed(fees: f64, processing_weeks: i64) -> Self {
        Self {
            score: permit_score(fees, processing_weeks),
            basis: ScoreBasis::Computed,
            fees,
            processing_weeks,
        }
    }

    fn fallback(fees: f64, processing_weeks: i64, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(%reason, "permit score fell back to flat default");
        Self {
            score: FALLBACK_SCORE,
            basis: ScoreBasis::Fallback { reason },
            fees,
            processing_weeks,
        }
    }
}

/// Decode a stage result that may be a JSON value or JSON text.
fn resolve(data: &Value) -> Result<Value, String> {
    match data {
        Value::String(text) => {
            serde_json::from_str(text).map_err(|e| format!("result is not JSON: {e}"))
        }
        other => Ok(other.clone()),
    }
}

fn permit_component(data: &Value) -> PermitComponent {
    let (fees, weeks) = (DEFAULT_FEES, DEFAULT_PROCESSING_WEEKS);

    let data = match resolve(data) {
        Ok(v) => v,
        Err(reason) => return PermitComponent::fallback(fees, weeks, reason),
    };
    let obj = match &data {
        Value::Object(obj) => obj,
        // A list has no `permit_form`, so defaults apply.
        Value::Array(_) => return PermitComponent::computed(fees, weeks),
        other => {
            return PermitComponent::fallback(
                fees,
                weeks,
                format!("permitting result is not an object: {other}"),
            );
        }
    };
    let Some(form) = obj.get("permit_form") else {
        return PermitComponent::computed(fees, weeks);
    };
    let Some(form) = form.as_object() else {
        return PermitComponent::fallback(fees, weeks, "permit_form is not an object");
    };

    let fees = match form.get("fees") {
        None => DEFAULT_FEES,
        Some(v) => match v.as_f64() {
            Some(f) => f,
            None => {
                return PermitComponent::fallback(fees, weeks, format!("fees is not numeric: {v}"));
            }
        },
    };

    let processing_time = match form.get("processing_time") {
        None => DEFAULT_PROCESSING_TIME,
        Some(Value::String(s)) => s.as_str(),
        Some(v) => {
            return PermitComponent::fallback(
                fees,
                weeks,
                format!("processing_time is not text: {v}"),
            );
        }
    };

    let weeks = if processing_time.contains("week") {
        let lead = processing_time.split('-').next().unwrap_or_default().trim();
        match lead.parse::<i64>() {
            Ok(w) => w,
            Err(_) => {
                return PermitComponent::fallback(
                    fees,
                    weeks,
                    format!("cannot read weeks from processing_time {processing_time:?}"),
                );
            }
        }
    } else {
        weeks
    };

    PermitComponent::computed(fees, weeks)
}

fn research_component(data: &Value) -> (f64, ScoreBasis) {
    let fallback = |reason: String| {
        warn!(%reason, "research score fell back to flat default");
        (FALLBACK_SCORE, ScoreBasis::Fallback { reason })
    };

    let data = match resolve(data) {
        Ok(v) => v,
        Err(reason) => return fallback(reason),
    };
    let Some(obj) = data.as_object() else {
        return fallback(format!("research result is not an object: {data}"));
    };
    let total = match obj.get("total_articles") {
        None => 0.0,
        Some(v) => match v.as_f64() {
            Some(n) => n,
            None => return fallback(format!("total_articles is not numeric: {v}")),
        },
    };
    (research_score(total), ScoreBasis::Computed)
}

/// Score a permitting result and a research result.
///
/// Each input is either structured JSON or a JSON string (as an agent
/// returns it). Components that cannot be read score [`FALLBACK_SCORE`]
/// and say so in their basis.
pub fn calculate_feasibility(permitting: &Value, research: &Value) -> FeasibilityResult {
    let permit = permit_component(permitting);
    let (research_score, research_basis) = research_component(research);

    let overall = overall_score(permit.score, research_score);
    let decision = Decision::from_score(overall);

    FeasibilityResult {
        overall_score: round1(overall),
        decision,
        risk_level: decision.risk_level(),
        permit_score: round1(permit.score),
        research_score: round1(research_score),
        fees: permit.fees,
        processing_weeks: permit.processing_weeks,
        permit_basis: permit.basis,
        research_basis,
    }
}
