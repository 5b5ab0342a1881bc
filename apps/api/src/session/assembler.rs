//! Profile assembly: flattens survey answers and merges them over the profile.
//!
//! Pure functions. Nothing here validates field presence; missing optional
//! fields are handled when the prompt is rendered.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::models::profile::Profile;

/// Delimiter used to flatten multi-select answers.
pub const MULTI_SELECT_DELIMITER: &str = ", ";

/// Display value for a multi-select question with nothing checked.
pub const NONE_SELECTED: &str = "None selected";

/// A single answer as submitted: free text / single choice, or a multi-select list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    /// Flattens the answer to its display string.
    ///
    /// Multi-select values are trimmed and blank entries dropped before joining.
    pub fn normalize(&self) -> String {
        match self {
            AnswerValue::Single(value) => value.clone(),
            AnswerValue::Multi(values) => {
                let selected: Vec<&str> = values
                    .iter()
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .collect();
                if selected.is_empty() {
                    NONE_SELECTED.to_string()
                } else {
                    selected.join(MULTI_SELECT_DELIMITER)
                }
            }
        }
    }
}

pub fn normalize_answers(answers: &BTreeMap<String, AnswerValue>) -> Profile {
    answers
        .iter()
        .map(|(key, value)| (key.clone(), value.normalize()))
        .collect()
}

/// Answers override or extend profile fields by key.
pub fn merge(profile: &Profile, answers: &Profile) -> Profile {
    let mut combined = profile.clone();
    combined.extend(answers.iter().map(|(k, v)| (k.clone(), v.clone())));
    combined
}
