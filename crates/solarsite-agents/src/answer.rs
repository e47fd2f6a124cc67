//! Reading a runner's answer back into structured data.

use serde::Serialize;
use serde_json::Value;
use solarsite_core::fence::parse_fenced;
use tracing::warn;

use crate::RunOutput;

/// A runner's answer, structured where possible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AgentAnswer {
    Structured(Value),
    Text(String),
    /// The runner itself failed; there is no answer to read.
    Unavailable { reason: String },
}

impl AgentAnswer {
    /// The value handed to the scorer. An unavailable answer is `null`,
    /// which scores as a fallback.
    pub fn scoring_input(&self) -> Value {
        match self {
            Self::Structured(v) => v.clone(),
            Self::Text(s) => Value::String(s.clone()),
            Self::Unavailable { .. } => Value::Null,
        }
    }

    /// The value recorded verbatim in reports.
    pub fn to_raw_value(&self) -> Value {
        match self {
            Self::Structured(v) => v.clone(),
            Self::Text(s) => Value::String(s.clone()),
            Self::Unavailable { reason } => Value::String(format!("Error: {reason}")),
        }
    }

    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Structured(v) => Some(v),
            _ => None,
        }
    }
}

fn decode(text: &str) -> AgentAnswer {
    match parse_fenced::<Value>(text) {
        Ok(v) => AgentAnswer::Structured(v),
        Err(e) => {
            warn!(error = %e, "failed to decode JSON from runner result; keeping raw text");
            AgentAnswer::Text(text.to_string())
        }
    }
}

/// Prefer `raw`; otherwise the last task's result; otherwise empty text.
/// Never fails.
pub fn parse_run_output(output: &RunOutput) -> AgentAnswer {
    if let Some(raw) = output.raw.as_deref().filter(|r| !r.is_empty()) {
        return decode(raw);
    }
    if let Some(last) = output.tasks_output.last() {
        return decode(&last.result);
    }
    AgentAnswer::Text(String::new())
}
