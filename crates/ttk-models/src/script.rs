//! Generated short-form scripts.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of scripts in every valid set.
pub const SCRIPT_SET_LEN: usize = 10;

/// A single short-form video script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ScriptRecord {
    /// Opening line that stops the scroll
    pub hook: String,
    /// Main spoken content
    pub script_body: String,
    /// Call to action
    pub cta: String,
    /// Editing / visual instructions
    pub visual_cue: String,
}

impl ScriptRecord {
    /// Name of the first empty field, if any.
    fn first_empty_field(&self) -> Option<&'static str> {
        [
            ("hook", &self.hook),
            ("script_body", &self.script_body),
            ("cta", &self.cta),
            ("visual_cue", &self.visual_cue),
        ]
        .into_iter()
        .find(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
    }
}

/// Reasons a list of records is not a valid [`ScriptSet`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptSetError {
    #[error("expected exactly {expected} scripts, got {actual}")]
    WrongCount { expected: usize, actual: usize },

    #[error("script {index}: field `{field}` must not be empty")]
    EmptyField { index: usize, field: &'static str },
}

/// Exactly ten non-empty scripts, in display order.
///
/// Only constructible through validation; deserialization runs the same check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "Vec<ScriptRecord>", into = "Vec<ScriptRecord>")]
pub struct ScriptSet(Vec<ScriptRecord>);

impl ScriptSet {
    /// Scripts in display order (index + 1 = clip number).
    pub fn records(&self) -> &[ScriptRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScriptRecord> {
        self.0.iter()
    }

    pub fn into_records(self) -> Vec<ScriptRecord> {
        self.0
    }
}

impl TryFrom<Vec<ScriptRecord>> for ScriptSet {
    type Error = ScriptSetError;

    fn try_from(records: Vec<ScriptRecord>) -> Result<Self, Self::Error> {
        if records.len() != SCRIPT_SET_LEN {
            return Err(ScriptSetError::WrongCount {
                expected: SCRIPT_SET_LEN,
                actual: records.len(),
            });
        }

        for (index, record) in records.iter().enumerate() {
            if let Some(field) = record.first_empty_field() {
                return Err(ScriptSetError::EmptyField { index, field });
            }
        }

        Ok(Self(records))
    }
}

impl From<ScriptSet> for Vec<ScriptRecord> {
    fn from(set: ScriptSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a ScriptSet {
    type Item = &'a ScriptRecord;
    type IntoIter = std::slice::Iter<'a, ScriptRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(i: usize) -> ScriptRecord {
        ScriptRecord {
            hook: format!("Hook {}", i),
            script_body: format!("Script body {}", i),
            cta: format!("CTA {}", i),
            visual_cue: format!("Visual cue {}", i),
        }
    }

    fn records(n: usize) -> Vec<ScriptRecord> {
        (1..=n).map(record).collect()
    }

    #[test]
    fn test_accepts_exactly_ten() {
        let set = ScriptSet::try_from(records(10)).unwrap();
        assert_eq!(set.len(), 10);
        assert_eq!(set.records()[0].hook, "Hook 1");
        assert_eq!(set.records()[9].hook, "Hook 10");
    }

    #[test]
    fn test_rejects_wrong_count() {
        assert_eq!(
            ScriptSet::try_from(records(5)),
            Err(ScriptSetError::WrongCount { expected: 10, actual: 5 })
        );
        assert_eq!(
            ScriptSet::try_from(records(11)),
            Err(ScriptSetError::WrongCount { expected: 10, actual: 11 })
        );
        assert!(ScriptSet::try_from(Vec::new()).is_err());
    }

    #[test]
    fn test_rejects_empty_field() {
        let mut list = records(10);
        list[3].cta.clear();

        assert_eq!(
            ScriptSet::try_from(list),
            Err(ScriptSetError::EmptyField { index: 3, field: "cta" })
        );
    }

    #[test]
    fn test_deserialize_runs_validation() {
        let json = serde_json::to_string(&records(10)).unwrap();
        let set: ScriptSet = serde_json::from_str(&json).unwrap();
        assert_eq!(set.len(), 10);

        let short = serde_json::to_string(&records(3)).unwrap();
        let err = serde_json::from_str::<ScriptSet>(&short).unwrap_err();
        assert!(err.to_string().contains("expected exactly 10 scripts"));
    }

    #[test]
    fn test_missing_field_fails_deserialization() {
        let mut values: Vec<serde_json::Value> = records(10)
            .into_iter()
            .map(|r| serde_json::to_value(r).unwrap())
            .collect();
        values[0].as_object_mut().unwrap().remove("script_body");

        let err = serde_json::from_value::<ScriptSet>(serde_json::Value::Array(values)).unwrap_err();
        assert!(err.to_string().contains("script_body"));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let set = ScriptSet::try_from(records(10)).unwrap();
        let value = serde_json::to_value(&set).unwrap();
        assert!(value.is_array());
        assert_eq!(value.as_array().unwrap().len(), 10);
    }
}
