use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The key of a field, e.g. `"project_name"`.
///
/// Keys identify a field inside a survey document and double as the key under
/// which its answer is stored. Keys are flat; no nesting is implied by dots.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKey {
    key: String,
}

impl FieldKey {
    /// Create a new key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Check if the key is empty.
    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl Borrow<str> for FieldKey {
    fn borrow(&self) -> &str {
        &self.key
    }
}

impl From<&str> for FieldKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for FieldKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&String> for FieldKey {
    fn from(s: &String) -> Self {
        Self::new(s.clone())
    }
}
