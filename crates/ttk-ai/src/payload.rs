//! Normalization of the model's JSON answer.

use serde_json::Value;

use ttk_models::{ScriptRecord, ScriptSet};

use crate::error::{GenerationError, GenerationResult};

/// The two answer shapes the model is known to produce.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptPayload {
    /// A bare array of scripts
    Bare(Vec<ScriptRecord>),
    /// `{ "scripts": [...] }`
    Wrapped { scripts: Vec<ScriptRecord> },
}

impl ScriptPayload {
    /// Parse model output. Any failure is a validation error carrying the
    /// underlying reason.
    pub fn parse(content: &str) -> GenerationResult<Self> {
        let value: Value = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| GenerationError::validation(e.to_string()))?;

        match value {
            Value::Array(_) => records_from(value).map(Self::Bare),
            Value::Object(mut map) => match map.remove("scripts") {
                Some(scripts @ Value::Array(_)) => {
                    records_from(scripts).map(|scripts| Self::Wrapped { scripts })
                }
                _ => Err(GenerationError::validation(
                    "Response does not contain scripts array",
                )),
            },
            _ => Err(GenerationError::validation(
                "Response does not contain scripts array",
            )),
        }
    }

    pub fn into_records(self) -> Vec<ScriptRecord> {
        match self {
            Self::Bare(scripts) | Self::Wrapped { scripts } => scripts,
        }
    }

    /// Enforce the exactly-ten, all-fields-present contract.
    pub fn into_script_set(self) -> GenerationResult<ScriptSet> {
        ScriptSet::try_from(self.into_records())
            .map_err(|e| GenerationError::validation(e.to_string()))
    }
}

fn records_from(value: Value) -> GenerationResult<Vec<ScriptRecord>> {
    serde_json::from_value(value).map_err(|e| GenerationError::validation(e.to_string()))
}

/// Models occasionally wrap JSON in a markdown fence despite instructions.
fn strip_code_fence(content: &str) -> &str {
    let text = content.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}
