//! # questionnaire-dialoguer
//!
//! Dialoguer backend for questionnaire.
//!
//! Groups are presented one after another on the terminal, each field as its
//! own prompt. Free text fields open `$EDITOR` unless the survey asks for an
//! accessible session.
//!
//! ## Example
//!
//! ```rust,no_run
//! use questionnaire::{RunOutcome, Survey};
//! use questionnaire_dialoguer::DialoguerBackend;
//!
//! fn main() -> anyhow::Result<()> {
//!     let survey = Survey::load("survey.yaml")?;
//!     match survey.run(&DialoguerBackend::new())? {
//!         RunOutcome::Completed { target, .. } => println!("answers written to {target}"),
//!         RunOutcome::Declined => println!("nothing written"),
//!     }
//!     Ok(())
//! }
//! ```

mod backend;

pub use backend::{DialoguerBackend, DialoguerError};
