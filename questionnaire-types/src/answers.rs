use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{AnswerValue, FieldKey};

/// Error type for answer access operations.
#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Missing answer for key: {0}")]
    MissingKey(FieldKey),

    #[error("Type mismatch at key '{key}': expected {expected}, got {actual}")]
    TypeMismatch {
        key: FieldKey,
        expected: &'static str,
        actual: &'static str,
    },
}

/// Collected answers of a survey, keyed by field key.
///
/// Keys are kept sorted so serializing the same answers always yields the same
/// bytes. Inserting an existing key replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Answers {
    values: BTreeMap<FieldKey, AnswerValue>,
}

impl Answers {
    /// Create a new empty answer collection.
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Insert an answer under the given key, returning the replaced value.
    pub fn insert(
        &mut self,
        key: impl Into<FieldKey>,
        value: impl Into<AnswerValue>,
    ) -> Option<AnswerValue> {
        self.values.insert(key.into(), value.into())
    }

    /// Get the answer for a key.
    pub fn get(&self, key: &str) -> Option<&AnswerValue> {
        self.values.get(key)
    }

    /// Check if an answer exists for a key.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Remove the answer for a key.
    pub fn remove(&mut self, key: &str) -> Option<AnswerValue> {
        self.values.remove(key)
    }

    /// Iterate over all key-value pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldKey, &AnswerValue)> {
        self.values.iter()
    }

    /// Iterate over all keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &FieldKey> {
        self.values.keys()
    }

    /// Get the number of answers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no answers.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a string answer.
    pub fn get_string(&self, key: &str) -> Result<&str, AnswerError> {
        match self.get(key) {
            Some(AnswerValue::String(s)) => Ok(s),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.into(),
                expected: "String",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.into())),
        }
    }

    /// Get a boolean answer.
    pub fn get_bool(&self, key: &str) -> Result<bool, AnswerError> {
        match self.get(key) {
            Some(AnswerValue::Bool(b)) => Ok(*b),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.into(),
                expected: "Bool",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.into())),
        }
    }

    /// Get a list answer.
    pub fn get_list(&self, key: &str) -> Result<&[String], AnswerError> {
        match self.get(key) {
            Some(AnswerValue::List(items)) => Ok(items),
            Some(other) => Err(AnswerError::TypeMismatch {
                key: key.into(),
                expected: "List",
                actual: other.type_name(),
            }),
            None => Err(AnswerError::MissingKey(key.into())),
        }
    }

    /// Render the answers as a JSON object, for use as template data.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.values
                .iter()
                .map(|(key, value)| {
                    let value = match value {
                        AnswerValue::String(s) => serde_json::Value::String(s.clone()),
                        AnswerValue::Bool(b) => serde_json::Value::Bool(*b),
                        AnswerValue::List(items) => serde_json::Value::Array(
                            items.iter().cloned().map(serde_json::Value::String).collect(),
                        ),
                    };
                    (key.to_string(), value)
                })
                .collect(),
        )
    }
}

impl FromIterator<(FieldKey, AnswerValue)> for Answers {
    fn from_iter<I: IntoIterator<Item = (FieldKey, AnswerValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Answers {
    type Item = (FieldKey, AnswerValue);
    type IntoIter = std::collections::btree_map::IntoIter<FieldKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Answers {
    type Item = (&'a FieldKey, &'a AnswerValue);
    type IntoIter = std::collections::btree_map::Iter<'a, FieldKey, AnswerValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
