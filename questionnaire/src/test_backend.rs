//! Test backend for running surveys without user interaction.
//!
//! `TestBackend` answers fields from a script of pre-defined values and
//! accepts the presented default for every field the script doesn't mention.
//! It remembers every group it was shown, so tests can check what an operator
//! would have seen.
//!
//! # Example
//!
//! ```rust,ignore
//! use questionnaire::{Survey, TestBackend};
//!
//! let survey = Survey::load("survey.yaml")?;
//! let backend = TestBackend::new()
//!     .with_string("name", "Ada")
//!     .with_bool("proceed", true);
//! let answers = survey.collect(&backend)?;
//! assert_eq!(answers.get_string("name")?, "Ada");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use crate::{
    AnswerValue, ConfirmPrompt, GroupSession, Prelude, PresentedField, SessionError,
    SessionStyle, SummarySection, SurveyBackend, ValidationFailure,
};

/// A backend that returns pre-configured answers.
#[derive(Debug, Clone, Default)]
pub struct TestBackend {
    responses: HashMap<String, AnswerValue>,
    confirmation: Option<bool>,
    cancel: bool,
    sessions: RefCell<Vec<GroupSession>>,
    prelude: RefCell<Option<Prelude>>,
    summary: RefCell<Vec<Vec<(String, AnswerValue)>>>,
}

/// Error type for TestBackend.
#[derive(Debug, thiserror::Error)]
pub enum TestBackendError {
    #[error("Nothing to answer for field '{0}'")]
    NoDefault(String),

    #[error("Validation failed for '{key}': {message}")]
    ValidationFailed { key: String, message: String },

    #[error("Survey cancelled by user")]
    Cancelled,
}

impl From<TestBackendError> for SessionError {
    fn from(err: TestBackendError) -> Self {
        match err {
            TestBackendError::Cancelled => SessionError::Cancelled,
            other => SessionError::backend(other),
        }
    }
}

impl TestBackend {
    /// Create a backend that accepts every default and confirms at the end.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the field with the given key.
    pub fn with_response(mut self, key: impl Into<String>, value: impl Into<AnswerValue>) -> Self {
        self.responses.insert(key.into(), value.into());
        self
    }

    /// Add a string answer (input, text, select).
    pub fn with_string(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_response(key, AnswerValue::String(value.into()))
    }

    /// Add a boolean answer (confirm).
    pub fn with_bool(self, key: impl Into<String>, value: bool) -> Self {
        self.with_response(key, AnswerValue::Bool(value))
    }

    /// Add a list answer (multiselect).
    pub fn with_list<S: Into<String>>(
        self,
        key: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.with_response(key, AnswerValue::List(values))
    }

    /// Answer the final confirmation. Without this, it is accepted.
    pub fn with_confirmation(mut self, confirm: bool) -> Self {
        self.confirmation = Some(confirm);
        self
    }

    /// Cancel the survey as soon as the first group is shown.
    pub fn cancelling(mut self) -> Self {
        self.cancel = true;
        self
    }

    /// Every group session shown so far.
    pub fn sessions(&self) -> Vec<GroupSession> {
        self.sessions.borrow().clone()
    }

    /// Keys of every field shown so far, notes included, in order.
    pub fn shown_keys(&self) -> Vec<String> {
        self.sessions
            .borrow()
            .iter()
            .flat_map(|session| session.fields.iter().map(|field| field.key.to_string()))
            .collect()
    }

    /// The last field shown with this key.
    pub fn shown_field(&self, key: &str) -> Option<PresentedField> {
        self.sessions
            .borrow()
            .iter()
            .flat_map(|session| session.fields.iter())
            .filter(|field| field.key.as_str() == key)
            .last()
            .cloned()
    }

    pub fn prelude_shown(&self) -> Option<Prelude> {
        self.prelude.borrow().clone()
    }

    /// The summary rows shown, as (key, answer) per group.
    pub fn summary_shown(&self) -> Vec<Vec<(String, AnswerValue)>> {
        self.summary.borrow().clone()
    }
}

impl SurveyBackend for TestBackend {
    type Error = TestBackendError;

    fn prelude(&self, prelude: &Prelude, _style: &SessionStyle) -> Result<(), Self::Error> {
        *self.prelude.borrow_mut() = Some(prelude.clone());
        Ok(())
    }

    fn collect_group(
        &self,
        session: &GroupSession,
        validate: &dyn Fn(usize, &AnswerValue) -> Result<(), ValidationFailure>,
    ) -> Result<Vec<Option<AnswerValue>>, Self::Error> {
        self.sessions.borrow_mut().push(session.clone());
        if self.cancel {
            return Err(TestBackendError::Cancelled);
        }

        let mut values = Vec::with_capacity(session.fields.len());
        for (position, field) in session.fields.iter().enumerate() {
            if field.kind.is_note() {
                values.push(None);
                continue;
            }
            let value = match self.responses.get(field.key.as_str()) {
                Some(value) => value.clone(),
                None => field
                    .accepted_default()
                    .ok_or_else(|| TestBackendError::NoDefault(field.key.to_string()))?,
            };
            if let Err(failure) = validate(position, &value) {
                return Err(TestBackendError::ValidationFailed {
                    key: field.key.to_string(),
                    message: failure.to_string(),
                });
            }
            values.push(Some(value));
        }
        Ok(values)
    }

    fn summarize(
        &self,
        sections: &[SummarySection<'_>],
        _style: &SessionStyle,
    ) -> Result<(), Self::Error> {
        let rows: Vec<Vec<(String, AnswerValue)>> = sections
            .iter()
            .map(|section| {
                section
                    .entries
                    .iter()
                    .map(|(field, value)| (field.key.to_string(), (*value).clone()))
                    .collect()
            })
            .collect();
        *self.summary.borrow_mut() = rows;
        Ok(())
    }

    fn confirm(&self, _prompt: &ConfirmPrompt, _style: &SessionStyle) -> Result<bool, Self::Error> {
        Ok(self.confirmation.unwrap_or(true))
    }
}
