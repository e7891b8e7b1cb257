//! Driving a survey from the first group to the written answers.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use questionnaire_types::{
    AnswerValue, Answers, Field, Group, GroupSession, Prelude, PresentedField, SessionError,
    SessionStyle, SummarySection, SurveyBackend, SurveyDocument, Theme, ValidationFailure,
};
use tracing::{debug, info, warn};

use crate::registry::{DefaultResolver, FieldType, FieldTypeRegistry};
use crate::serializer::{self, OutputTarget};
use crate::{Environment, ResolutionContext, SurveyError, TemplateResolver, load_document};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    LoadingSchema,
    LoadingPersisted,
    RenderingGroup(usize),
    Validating(usize),
    Collecting(usize),
    Summarizing,
    Confirming,
    Serializing,
    Done,
    Aborted,
}

/// How a run ended, short of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Answers were collected and written.
    Completed {
        answers: Answers,
        target: OutputTarget,
    },

    /// The operator said no at the final confirmation. Nothing was written.
    Declined,
}

/// A loaded survey, ready to run against a backend.
#[derive(Debug)]
pub struct Survey {
    document: SurveyDocument,
    source: PathBuf,
    persisted: Answers,
    environment: Environment,
    registry: FieldTypeRegistry,
    templates: TemplateResolver,
    style: SessionStyle,
    state: Cell<RunState>,
}

impl Survey {
    /// Load a survey document and the answers of any earlier run.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SurveyError> {
        let path = path.as_ref();
        debug!(state = ?RunState::LoadingSchema, "run state");
        let document = load_document(path)?;
        Self::new(document, path)
    }

    /// Prepare an already loaded document. `source` is where it came from.
    ///
    /// Answers of an earlier run are read here, once, from the document's output.
    pub fn new(document: SurveyDocument, source: impl Into<PathBuf>) -> Result<Self, SurveyError> {
        debug!(state = ?RunState::LoadingPersisted, "run state");
        let persisted = crate::load_persisted(&document.output)?;

        let theme = Theme::from_name(&document.theme).unwrap_or_else(|| {
            warn!(theme = %document.theme, "unsupported theme, using the default");
            Theme::default()
        });
        let style = SessionStyle::new(theme, document.accessible);

        Ok(Self {
            document,
            source: source.into(),
            persisted,
            environment: Environment::capture(),
            registry: FieldTypeRegistry::builtin(),
            templates: TemplateResolver::new(),
            style,
            state: Cell::new(RunState::Idle),
        })
    }

    /// Replace the environment visible to templates.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    /// Replace the field type handlers.
    pub fn with_registry(mut self, registry: FieldTypeRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn document(&self) -> &SurveyDocument {
        &self.document
    }

    /// Answers of the earlier run, used as defaults.
    pub fn persisted(&self) -> &Answers {
        &self.persisted
    }

    pub fn style(&self) -> SessionStyle {
        self.style
    }

    /// The state the last run reached.
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    pub fn output_target(&self) -> OutputTarget {
        OutputTarget::from_output(&self.document.output)
    }

    /// The message shown before the first group.
    pub fn prelude(&self) -> Prelude {
        let title = format!("{}, version {}", self.document.name, self.document.version);
        let body = format!(
            "Reading questions from {}, writing answers to {}\n\n{}",
            self.source.display(),
            self.output_target(),
            self.document.description
        );
        Prelude {
            title: title.trim().to_string(),
            body: body.trim().to_string(),
        }
    }

    fn enter(&self, state: RunState) {
        debug!(?state, "run state");
        self.state.set(state);
    }

    /// Run the whole survey: every group, the summary, the confirmation, and
    /// finally writing the answers.
    pub fn run<B: SurveyBackend>(&self, backend: &B) -> Result<RunOutcome, SurveyError> {
        let outcome = self.run_to_end(backend);
        if outcome.is_err() {
            self.enter(RunState::Aborted);
        }
        outcome
    }

    fn run_to_end<B: SurveyBackend>(&self, backend: &B) -> Result<RunOutcome, SurveyError> {
        backend
            .prelude(&self.prelude(), &self.style)
            .map_err(session_error)?;

        let answers = self.collect(backend)?;

        if self.document.summary {
            self.enter(RunState::Summarizing);
            let rows = self.summary_rows(&answers);
            let sections: Vec<_> = rows
                .iter()
                .map(|(group, entries)| SummarySection {
                    group: *group,
                    entries: entries.as_slice(),
                })
                .collect();
            backend
                .summarize(&sections, &self.style)
                .map_err(session_error)?;
        }

        if let Some(prompt) = &self.document.confirm {
            self.enter(RunState::Confirming);
            let confirmed = backend
                .confirm(prompt, &self.style)
                .map_err(session_error)?;
            if !confirmed {
                info!("operator declined, nothing written");
                self.enter(RunState::Aborted);
                return Ok(RunOutcome::Declined);
            }
        }

        self.enter(RunState::Serializing);
        let target = self.output_target();
        let format_path = match &target {
            OutputTarget::File(path) => path.as_path(),
            OutputTarget::Stdout => self.source.as_path(),
        };
        let bytes = serializer::serialize(&answers, format_path)?;
        serializer::write(&bytes, &target)?;

        self.enter(RunState::Done);
        Ok(RunOutcome::Completed { answers, target })
    }

    /// Present every group with value fields, in document order, and collect
    /// the answers.
    ///
    /// Defaults of a group are resolved right before it is shown, so they see
    /// the answers of all earlier groups and none of the later ones.
    pub fn collect<B: SurveyBackend>(&self, backend: &B) -> Result<Answers, SurveyError> {
        let mut answers = Answers::new();

        for (index, group) in self.document.groups().enumerate() {
            if !group.has_value_fields() {
                debug!(group = index, title = %group.title, "skipping group without value fields");
                continue;
            }
            self.enter(RunState::RenderingGroup(index));

            let entries = self.present_group(&group.fields, &answers)?;
            let session = GroupSession {
                title: group.title.trim().to_string(),
                description: group.description.trim().to_string(),
                fields: entries.iter().map(|(_, field)| field.clone()).collect(),
                style: self.style,
            };
            let validate = |position: usize,
                            value: &AnswerValue|
             -> Result<(), ValidationFailure> {
                match entries.get(position) {
                    Some((field_type, entry)) => field_type.validate(entry, value),
                    None => Err(ValidationFailure::new(format!(
                        "no field at position {position} of this group"
                    ))),
                }
            };
            let mut collected = backend
                .collect_group(&session, &validate)
                .map_err(session_error)?
                .into_iter();

            self.enter(RunState::Validating(index));
            let mut accepted = Vec::new();
            for (field_type, field) in &entries {
                let value = collected.next().flatten();
                if !field_type.produces_answer() {
                    continue;
                }
                let value = value.ok_or_else(|| SurveyError::InvalidAnswer {
                    key: field.key.clone(),
                    reason: "no value was collected".to_string(),
                })?;
                field_type
                    .validate(field, &value)
                    .map_err(|failure| SurveyError::InvalidAnswer {
                        key: field.key.clone(),
                        reason: failure.to_string(),
                    })?;
                accepted.push((field.key.clone(), field_type.to_answer(field, value)?));
            }

            // Document order, so a repeated key keeps the last field's value.
            self.enter(RunState::Collecting(index));
            for (key, value) in accepted {
                if answers.insert(key.clone(), value).is_some() {
                    warn!(%key, "answer replaced by a later field with the same key");
                }
            }
        }

        Ok(answers)
    }

    /// Resolve every field of a group before any of it is shown, so an
    /// unsupported field stops the run before its group opens.
    fn present_group(
        &self,
        fields: &[Field],
        answers: &Answers,
    ) -> Result<Vec<(&dyn FieldType, PresentedField)>, SurveyError> {
        let context = ResolutionContext::new(&self.environment, answers);
        let defaults = DefaultResolver::new(&self.templates, context, &self.persisted);

        let handlers = fields
            .iter()
            .map(|field| self.registry.lookup(field))
            .collect::<Result<Vec<_>, _>>()?;

        fields
            .iter()
            .zip(handlers)
            .map(|(field, field_type)| {
                field_type
                    .present(field, &defaults)
                    .map(|presented| (field_type, presented))
            })
            .collect()
    }

    fn summary_rows<'a>(
        &'a self,
        answers: &'a Answers,
    ) -> Vec<(&'a Group, Vec<(&'a Field, &'a AnswerValue)>)> {
        self.document
            .groups()
            .filter_map(|group| {
                let entries: Vec<_> = group
                    .value_fields()
                    .filter_map(|field| Some((field, answers.get(field.key.as_str())?)))
                    .collect();
                (!entries.is_empty()).then_some((group, entries))
            })
            .collect()
    }
}

fn session_error(err: impl Into<SessionError>) -> SurveyError {
    SurveyError::from(err.into())
}
