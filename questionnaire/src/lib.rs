//! # questionnaire
//!
//! Run interactive surveys described by YAML or JSON documents. Backend-agnostic.
//!
//! A survey document lists forms, groups and fields. Each group is shown as
//! one prompt session by a backend; the answers are collected into a single
//! key/value map and written to the document's `output` (or stdout).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use questionnaire::{RunOutcome, Survey};
//!
//! let survey = Survey::load("survey.yaml")?;
//! match survey.run(&backend)? {
//!     RunOutcome::Completed { target, .. } => eprintln!("answers written to {target}"),
//!     RunOutcome::Declined => eprintln!("nothing written"),
//! }
//! ```
//!
//! ## Document
//!
//! ```yaml
//! name: scaffold
//! version: "1.0"
//! output: answers.json
//! summary: true
//! confirm:
//!   title: Write the answers?
//! forms:
//!   - groups:
//!       - title: Project
//!         fields:
//!           - key: name
//!             type: input
//!             required: true
//!             default: "{{env.USER}}-app"
//!           - key: repo
//!             type: input
//!             default: "github.com/{{env.USER}}/{{answers.name}}"
//! ```
//!
//! Field types are `note`, `input`, `text`, `select`, `multiselect` and
//! `confirm`. Input and text defaults are templates: `{{env.NAME}}` reads an
//! environment variable and `{{answers.KEY}}` an answer from an earlier group.
//! When the output file already exists, its answers become the new defaults.
//!
//! ## Backends
//!
//! Backends are separate crates that implement `SurveyBackend`:
//! - `questionnaire-dialoguer` - CLI prompts via dialoguer

// Re-export all types from questionnaire-types
pub use questionnaire_types::*;

mod error;
pub use error::{FormatError, SurveyError};

mod format;
pub use format::DataFormat;

mod schema;
pub use schema::load_document;

mod store;
pub use store::load_persisted;

mod template;
pub use template::{Environment, ResolutionContext, TemplateResolver};

pub mod registry;
pub use registry::{FieldType, FieldTypeRegistry};

pub mod serializer;
pub use serializer::OutputTarget;

mod runner;
pub use runner::{RunOutcome, RunState, Survey};

// Test backend for running surveys without user interaction
mod test_backend;
pub use test_backend::{TestBackend, TestBackendError};
