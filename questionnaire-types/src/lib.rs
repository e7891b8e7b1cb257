//! Core types for the questionnaire crate.
//!
//! This crate provides the foundational types for schema-driven surveys:
//! - `SurveyDocument`, `Form`, `Group` and `Field` - The loaded survey document
//! - `AnswerValue` and `Answers` - Collected data keyed by `FieldKey`
//! - `PresentedField` and `GroupSession` - What a backend is asked to show
//! - `SurveyBackend` trait - For implementing rendering backends

mod field_key;
pub use field_key::FieldKey;

mod answer_value;
pub use answer_value::AnswerValue;

mod answers;
pub use answers::{AnswerError, Answers};

mod document;
pub use document::{
    ConfirmPrompt, Field, FieldDefault, FieldKind, Form, Group, STDOUT_SENTINEL, SelectOption,
    SurveyDocument,
};

mod presented;
pub use presented::{
    GroupSession, Prelude, PresentedField, PresentedOption, SessionStyle, SummarySection, Theme,
};

mod error;
pub use error::{SessionError, ValidationFailure};

mod traits;
pub use traits::SurveyBackend;
