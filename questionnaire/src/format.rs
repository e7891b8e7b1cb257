//! Structured data codecs, picked by file extension.

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::FormatError;

/// A structured data format understood for documents and answer files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Yaml,
    Json,
}

impl DataFormat {
    /// Pick the format from the path's extension (`.yaml`, `.yml` or `.json`).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn decode<T: DeserializeOwned>(self, bytes: &[u8]) -> Result<T, FormatError> {
        match self {
            Self::Yaml => Ok(serde_yaml::from_slice(bytes)?),
            Self::Json => Ok(serde_json::from_slice(bytes)?),
        }
    }

    /// Render the whole value in memory.
    pub fn encode<T: Serialize>(self, value: &T) -> Result<Vec<u8>, FormatError> {
        match self {
            Self::Yaml => Ok(serde_yaml::to_string(value)?.into_bytes()),
            Self::Json => Ok(serde_json::to_vec(value)?),
        }
    }
}
