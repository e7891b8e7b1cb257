use std::path::PathBuf;

use questionnaire_types::{FieldKey, SessionError};

/// Parse or render failure of a structured data codec.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Error type for loading, running and persisting a survey.
///
/// Every variant ends the run. Invalid operator input never shows up here;
/// backends re-prompt for it.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error(
        "unsupported file extension for '{}', only .yaml, .yml and .json are supported",
        path.display()
    )]
    UnsupportedFormat { path: PathBuf },

    #[error("failed to parse survey document '{}'", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("failed to parse previous answers in '{}'", path.display())]
    PersistedAnswers {
        path: PathBuf,
        #[source]
        source: FormatError,
    },

    #[error("unsupported field type '{kind}' for field '{key}'")]
    UnsupportedFieldType { key: FieldKey, kind: String },

    #[error("invalid default template for field '{key}'")]
    Template {
        key: FieldKey,
        #[source]
        source: Box<handlebars::RenderError>,
    },

    #[error("failed to serialize answers for '{target}'")]
    Serialization {
        target: String,
        #[source]
        source: FormatError,
    },

    #[error("I/O error on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend handed back something the field can't accept.
    #[error("invalid answer for field '{key}': {reason}")]
    InvalidAnswer { key: FieldKey, reason: String },

    #[error("survey cancelled by user")]
    Cancelled,

    #[error("backend error")]
    Backend(#[source] anyhow::Error),
}

impl SurveyError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if this error represents user cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<SessionError> for SurveyError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Cancelled => Self::Cancelled,
            SessionError::Backend(err) => Self::Backend(err),
        }
    }
}
