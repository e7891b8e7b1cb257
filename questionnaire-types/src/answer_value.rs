use std::fmt;

use serde::{Deserialize, Serialize};

/// A single answer collected from a survey.
///
/// This is the value stored in `Answers` for each rendered field. It serializes
/// untagged, so answer files contain plain strings, booleans and string lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    /// A boolean value (from confirm fields).
    Bool(bool),

    /// A string value (from input, text and select fields).
    String(String),

    /// A set of chosen option values (from multiselect fields), in option order.
    List(Vec<String>),
}

impl AnswerValue {
    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a list of strings.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Check whether the value counts as "no answer" for required fields.
    ///
    /// Booleans are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(_) => false,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Bool(_) => "Bool",
            Self::List(_) => "List",
        }
    }

    /// Convert a loosely-typed structured value into an answer.
    ///
    /// Returns `None` for shapes an answer can't hold (numbers, maps, null,
    /// or lists containing anything but strings).
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(Self::Bool(*b)),
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Vec<_>>>()
                .map(Self::List),
            _ => None,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::List(items) => write!(f, "[{}]", items.join(" ")),
        }
    }
}

impl From<String> for AnswerValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for AnswerValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<bool> for AnswerValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<Vec<String>> for AnswerValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness() {
        assert!(AnswerValue::from("").is_empty());
        assert!(AnswerValue::List(Vec::new()).is_empty());
        assert!(!AnswerValue::Bool(false).is_empty());
        assert!(!AnswerValue::from("x").is_empty());
    }

    #[test]
    fn from_json_accepts_answer_shapes_only() {
        assert_eq!(
            AnswerValue::from_json(&serde_json::json!(["a", "b"])),
            Some(AnswerValue::from(vec!["a", "b"]))
        );
        assert_eq!(
            AnswerValue::from_json(&serde_json::json!(true)),
            Some(AnswerValue::Bool(true))
        );
        assert_eq!(AnswerValue::from_json(&serde_json::json!(42)), None);
        assert_eq!(AnswerValue::from_json(&serde_json::json!(["a", 1])), None);
        assert_eq!(AnswerValue::from_json(&serde_json::json!({"a": "b"})), None);
    }

    #[test]
    fn serializes_untagged() {
        let json = serde_json::to_string(&AnswerValue::from(vec!["rust", "go"])).unwrap();
        assert_eq!(json, r#"["rust","go"]"#);
        let json = serde_json::to_string(&AnswerValue::Bool(true)).unwrap();
        assert_eq!(json, "true");
    }

    #[test]
    fn display() {
        assert_eq!(AnswerValue::from(vec!["a", "b"]).to_string(), "[a b]");
        assert_eq!(AnswerValue::Bool(false).to_string(), "false");
    }
}
