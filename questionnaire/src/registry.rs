//! One handler per field kind.
//!
//! A handler turns a document field into a `PresentedField` with its effective
//! default, judges the values a backend returns, and converts them into
//! answers. Defaults are resolved in two phases: first the document default
//! (templated for input and text), then an answer from an earlier run
//! overrides it if one exists for the field's key.

use questionnaire_types::{
    AnswerValue, Answers, Field, FieldKind, PresentedField, PresentedOption, ValidationFailure,
};
use tracing::debug;

use crate::{ResolutionContext, SurveyError, TemplateResolver};

/// Everything a handler needs to resolve a field's default.
#[derive(Debug, Clone, Copy)]
pub struct DefaultResolver<'a> {
    templates: &'a TemplateResolver,
    context: ResolutionContext<'a>,
    persisted: &'a Answers,
}

impl<'a> DefaultResolver<'a> {
    pub fn new(
        templates: &'a TemplateResolver,
        context: ResolutionContext<'a>,
        persisted: &'a Answers,
    ) -> Self {
        Self {
            templates,
            context,
            persisted,
        }
    }

    /// First phase: expand a templated default.
    pub fn expand(&self, field: &Field, template: &str) -> Result<String, SurveyError> {
        let expanded = self
            .templates
            .resolve(template, &self.context)
            .map_err(|source| SurveyError::Template {
                key: field.key.clone(),
                source: Box::new(source),
            })?;
        if expanded != template {
            debug!(key = %field.key, %expanded, "expanded default template");
        }
        Ok(expanded)
    }

    /// Second phase: the answer an earlier run gave for this field, if any.
    pub fn resumed(&self, field: &Field) -> Option<&'a AnswerValue> {
        self.persisted.get(field.key.as_str())
    }
}

/// Behaviour of one field kind.
pub trait FieldType: Send + Sync {
    /// The kind this handler is registered for.
    fn kind(&self) -> FieldKind;

    /// Build what the backend shows, including the effective default.
    fn present(
        &self,
        field: &Field,
        defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError>;

    /// Judge a value the operator entered.
    fn validate(&self, field: &PresentedField, value: &AnswerValue)
    -> Result<(), ValidationFailure>;

    /// Whether fields of this kind end up in the answers at all.
    fn produces_answer(&self) -> bool {
        true
    }

    /// Convert an accepted value into the answer stored under the field's key.
    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError>;
}

fn shape_mismatch(field: &PresentedField, expected: &str, value: &AnswerValue) -> SurveyError {
    SurveyError::InvalidAnswer {
        key: field.key.clone(),
        reason: format!(
            "a {} field takes a {expected}, got {}",
            field.kind,
            value.type_name()
        ),
    }
}

/// Informational text, never answered.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteType;

impl FieldType for NoteType {
    fn kind(&self) -> FieldKind {
        FieldKind::Note
    }

    fn present(
        &self,
        field: &Field,
        _defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError> {
        Ok(PresentedField::from_field(field))
    }

    fn validate(
        &self,
        _field: &PresentedField,
        _value: &AnswerValue,
    ) -> Result<(), ValidationFailure> {
        Ok(())
    }

    fn produces_answer(&self) -> bool {
        false
    }

    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError> {
        Err(shape_mismatch(field, "nothing", &value))
    }
}

/// Free text, single-line (`input`) or multi-line (`text`).
#[derive(Debug, Clone, Copy)]
pub struct TextEntryType {
    multiline: bool,
}

impl TextEntryType {
    pub fn input() -> Self {
        Self { multiline: false }
    }

    pub fn text() -> Self {
        Self { multiline: true }
    }
}

impl FieldType for TextEntryType {
    fn kind(&self) -> FieldKind {
        if self.multiline {
            FieldKind::Text
        } else {
            FieldKind::Input
        }
    }

    fn present(
        &self,
        field: &Field,
        defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError> {
        let mut value = match field.default.as_text() {
            Some(template) => defaults.expand(field, template)?,
            None => String::new(),
        };
        if let Some(AnswerValue::String(previous)) = defaults.resumed(field) {
            debug!(key = %field.key, "resuming previous answer");
            value = previous.clone();
        }

        let mut presented = PresentedField::from_field(field);
        presented.initial = Some(AnswerValue::String(value));
        Ok(presented)
    }

    fn validate(&self, field: &PresentedField, value: &AnswerValue) -> Result<(), ValidationFailure> {
        if field.required && value.is_empty() {
            return Err(ValidationFailure::new("value is required"));
        }
        Ok(())
    }

    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError> {
        match value {
            AnswerValue::String(_) => Ok(value),
            other => Err(shape_mismatch(field, "string", &other)),
        }
    }
}

/// Pick exactly one option.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectType;

impl FieldType for SelectType {
    fn kind(&self) -> FieldKind {
        FieldKind::Select
    }

    fn present(
        &self,
        field: &Field,
        defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError> {
        let is_option = |value: &str| field.options.iter().any(|option| option.value == value);

        let resumed = match defaults.resumed(field) {
            Some(AnswerValue::String(previous)) if is_option(previous) => {
                debug!(key = %field.key, "resuming previous choice");
                Some(previous.as_str())
            }
            _ => None,
        };
        let chosen = resumed
            .or_else(|| field.default.as_text().filter(|value| is_option(value)))
            .or_else(|| {
                field
                    .options
                    .iter()
                    .find(|option| option.preselected)
                    .map(|option| option.value.as_str())
            });

        let mut presented = PresentedField::from_field(field);
        let mut marked = false;
        presented.options = field
            .options
            .iter()
            .map(|option| {
                // The first match wins if option values repeat.
                let selected = !marked && chosen == Some(option.value.as_str());
                marked |= selected;
                PresentedOption {
                    label: option.display_key.clone(),
                    value: option.value.clone(),
                    selected,
                }
            })
            .collect();
        presented.initial = Some(AnswerValue::String(
            chosen.map(str::to_string).unwrap_or_default(),
        ));
        Ok(presented)
    }

    fn validate(&self, field: &PresentedField, value: &AnswerValue) -> Result<(), ValidationFailure> {
        let Some(choice) = value.as_str() else {
            return Err(ValidationFailure::new("a single item is required"));
        };
        if choice.is_empty() {
            if field.required {
                return Err(ValidationFailure::new("a single item is required"));
            }
            return Ok(());
        }
        if !field.options.iter().any(|option| option.value == choice) {
            return Err(ValidationFailure::new(format!(
                "'{choice}' is not one of the options"
            )));
        }
        Ok(())
    }

    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError> {
        match value {
            AnswerValue::String(_) => Ok(value),
            other => Err(shape_mismatch(field, "string", &other)),
        }
    }
}

/// Pick any number of options.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiSelectType;

impl FieldType for MultiSelectType {
    fn kind(&self) -> FieldKind {
        FieldKind::MultiSelect
    }

    fn present(
        &self,
        field: &Field,
        defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError> {
        let resumed = match defaults.resumed(field) {
            Some(AnswerValue::List(previous)) => {
                debug!(key = %field.key, "resuming previous choices");
                Some(previous.as_slice())
            }
            _ => None,
        };
        let static_default = field.default.as_set().unwrap_or_default();

        let mut presented = PresentedField::from_field(field);
        presented.options = field
            .options
            .iter()
            .map(|option| {
                // A resumed set replaces both the static default and the preselection.
                let selected = match resumed {
                    Some(previous) => previous.contains(&option.value),
                    None => option.preselected || static_default.contains(&option.value),
                };
                PresentedOption {
                    label: option.display_key.clone(),
                    value: option.value.clone(),
                    selected,
                }
            })
            .collect();
        presented.initial = Some(AnswerValue::List(presented.selected_values()));
        Ok(presented)
    }

    fn validate(&self, field: &PresentedField, value: &AnswerValue) -> Result<(), ValidationFailure> {
        let Some(choices) = value.as_list() else {
            return Err(ValidationFailure::new("a list of items is required"));
        };
        if field.required && choices.is_empty() {
            return Err(ValidationFailure::new("at least one item is required"));
        }
        if let Some(unknown) = choices
            .iter()
            .find(|choice| !field.options.iter().any(|option| &option.value == *choice))
        {
            return Err(ValidationFailure::new(format!(
                "'{unknown}' is not one of the options"
            )));
        }
        Ok(())
    }

    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError> {
        match value {
            AnswerValue::List(_) => Ok(value),
            other => Err(shape_mismatch(field, "list", &other)),
        }
    }
}

/// Yes or no. Boolean defaults are literal, never templated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfirmType;

impl FieldType for ConfirmType {
    fn kind(&self) -> FieldKind {
        FieldKind::Confirm
    }

    fn present(
        &self,
        field: &Field,
        defaults: &DefaultResolver<'_>,
    ) -> Result<PresentedField, SurveyError> {
        let mut value = field.default.as_flag().unwrap_or(false);
        if let Some(AnswerValue::Bool(previous)) = defaults.resumed(field) {
            debug!(key = %field.key, "resuming previous answer");
            value = *previous;
        }

        let mut presented = PresentedField::from_field(field);
        presented.initial = Some(AnswerValue::Bool(value));
        Ok(presented)
    }

    fn validate(
        &self,
        _field: &PresentedField,
        _value: &AnswerValue,
    ) -> Result<(), ValidationFailure> {
        Ok(())
    }

    fn to_answer(
        &self,
        field: &PresentedField,
        value: AnswerValue,
    ) -> Result<AnswerValue, SurveyError> {
        match value {
            AnswerValue::Bool(_) => Ok(value),
            other => Err(shape_mismatch(field, "boolean", &other)),
        }
    }
}

/// Maps field kinds to their handlers.
pub struct FieldTypeRegistry {
    types: Vec<Box<dyn FieldType>>,
}

impl FieldTypeRegistry {
    /// A registry with no handlers at all.
    pub fn empty() -> Self {
        Self { types: Vec::new() }
    }

    /// A registry with handlers for note, input, text, select, multiselect and confirm.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(NoteType);
        registry.register(TextEntryType::input());
        registry.register(TextEntryType::text());
        registry.register(SelectType);
        registry.register(MultiSelectType);
        registry.register(ConfirmType);
        registry
    }

    /// Add a handler, replacing any earlier one for the same kind.
    pub fn register(&mut self, field_type: impl FieldType + 'static) {
        let kind = field_type.kind();
        self.types.retain(|existing| existing.kind() != kind);
        self.types.push(Box::new(field_type));
    }

    /// Find the handler for a field.
    pub fn lookup(&self, field: &Field) -> Result<&dyn FieldType, SurveyError> {
        self.types
            .iter()
            .find(|field_type| field_type.kind() == field.kind)
            .map(Box::as_ref)
            .ok_or_else(|| SurveyError::UnsupportedFieldType {
                key: field.key.clone(),
                kind: field.kind.name().to_string(),
            })
    }
}

impl Default for FieldTypeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for FieldTypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.types.iter().map(|field_type| field_type.kind()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use questionnaire_types::{FieldDefault, SelectOption};

    use super::*;
    use crate::Environment;

    struct Fixture {
        templates: TemplateResolver,
        environment: Environment,
        answers: Answers,
        persisted: Answers,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                templates: TemplateResolver::new(),
                environment: Environment::empty().with_var("USER", "ada"),
                answers: Answers::new(),
                persisted: Answers::new(),
            }
        }

        fn present(&self, field: &Field) -> Result<PresentedField, SurveyError> {
            let defaults = DefaultResolver::new(
                &self.templates,
                ResolutionContext::new(&self.environment, &self.answers),
                &self.persisted,
            );
            FieldTypeRegistry::builtin()
                .lookup(field)?
                .present(field, &defaults)
        }
    }

    fn field(key: &str, kind: FieldKind) -> Field {
        Field {
            key: key.into(),
            kind,
            ..Field::default()
        }
    }

    fn license_field() -> Field {
        Field {
            options: vec![
                SelectOption::new("mit").with_label("MIT"),
                SelectOption::new("apache").preselected(),
                SelectOption::new("gpl"),
            ],
            ..field("license", FieldKind::Select)
        }
    }

    #[test]
    fn input_default_is_templated() {
        let mut fixture = Fixture::new();
        fixture.answers.insert("name", "app");
        let input = Field {
            default: FieldDefault::Text("{{env.USER}}/{{answers.name}}".to_string()),
            ..field("repo", FieldKind::Input)
        };

        let presented = fixture.present(&input).unwrap();
        assert_eq!(presented.initial, Some(AnswerValue::from("ada/app")));
    }

    #[test]
    fn resumed_answer_overrides_template() {
        let mut fixture = Fixture::new();
        fixture.persisted.insert("repo", "kept");
        let text = Field {
            default: FieldDefault::Text("{{env.USER}}".to_string()),
            ..field("repo", FieldKind::Text)
        };

        let presented = fixture.present(&text).unwrap();
        assert_eq!(presented.initial_text(), "kept");
    }

    #[test]
    fn resumed_answer_of_wrong_shape_is_ignored() {
        let mut fixture = Fixture::new();
        fixture.persisted.insert("repo", true);
        let input = Field {
            default: FieldDefault::Text("x".to_string()),
            ..field("repo", FieldKind::Input)
        };

        assert_eq!(fixture.present(&input).unwrap().initial_text(), "x");
    }

    #[test]
    fn broken_template_names_the_field() {
        let input = Field {
            default: FieldDefault::Text("{{answers.name".to_string()),
            ..field("repo", FieldKind::Input)
        };

        let err = Fixture::new().present(&input).unwrap_err();
        assert!(matches!(err, SurveyError::Template { ref key, .. } if key.as_str() == "repo"));
    }

    #[test]
    fn select_prefers_resumed_then_default_then_preselection() {
        let mut fixture = Fixture::new();
        let mut license = license_field();
        assert_eq!(fixture.present(&license).unwrap().selected_index(), Some(1));

        license.default = FieldDefault::Text("gpl".to_string());
        assert_eq!(fixture.present(&license).unwrap().selected_index(), Some(2));

        fixture.persisted.insert("license", "mit");
        let presented = fixture.present(&license).unwrap();
        assert_eq!(presented.selected_index(), Some(0));
        assert_eq!(presented.initial, Some(AnswerValue::from("mit")));
        assert_eq!(presented.options[0].label, "MIT");
        assert_eq!(presented.options.iter().filter(|o| o.selected).count(), 1);
    }

    #[test]
    fn select_matches_resume_by_value_not_label() {
        let mut fixture = Fixture::new();
        fixture.persisted.insert("license", "MIT");
        let presented = fixture.present(&license_field()).unwrap();
        assert_eq!(presented.selected_index(), Some(1));
    }

    #[test]
    fn select_template_defaults_are_literal() {
        let select = Field {
            default: FieldDefault::Text("{{env.USER}}".to_string()),
            options: vec![SelectOption::new("{{env.USER}}")],
            ..field("who", FieldKind::Select)
        };
        let presented = Fixture::new().present(&select).unwrap();
        assert_eq!(presented.initial_text(), "{{env.USER}}");
    }

    #[test]
    fn multiselect_combines_default_and_preselection() {
        let multi = Field {
            kind: FieldKind::MultiSelect,
            default: FieldDefault::Set(vec!["gpl".to_string()]),
            ..license_field()
        };
        let presented = Fixture::new().present(&multi).unwrap();
        assert_eq!(presented.selected_values(), ["apache", "gpl"]);
        assert_eq!(
            presented.initial,
            Some(AnswerValue::from(vec!["apache", "gpl"]))
        );
    }

    #[test]
    fn multiselect_resume_replaces_default() {
        let mut fixture = Fixture::new();
        fixture
            .persisted
            .insert("license", vec!["mit", "not-an-option"]);
        let multi = Field {
            kind: FieldKind::MultiSelect,
            default: FieldDefault::Set(vec!["gpl".to_string()]),
            ..license_field()
        };
        let presented = fixture.present(&multi).unwrap();
        assert_eq!(presented.selected_values(), ["mit"]);
    }

    #[test]
    fn confirm_default_and_resume() {
        let mut fixture = Fixture::new();
        let confirm = Field {
            default: FieldDefault::Flag(true),
            ..field("proceed", FieldKind::Confirm)
        };
        assert!(fixture.present(&confirm).unwrap().initial_flag());

        fixture.persisted.insert("proceed", false);
        assert!(!fixture.present(&confirm).unwrap().initial_flag());
    }

    #[test]
    fn required_values_must_not_be_empty() {
        let registry = FieldTypeRegistry::builtin();
        let fixture = Fixture::new();

        let input = Field {
            required: true,
            ..field("name", FieldKind::Input)
        };
        let presented = fixture.present(&input).unwrap();
        let handler = registry.lookup(&input).unwrap();
        assert!(handler.validate(&presented, &"".into()).is_err());
        assert!(handler.validate(&presented, &"Ada".into()).is_ok());

        let multi = Field {
            required: true,
            kind: FieldKind::MultiSelect,
            ..license_field()
        };
        let presented = fixture.present(&multi).unwrap();
        let handler = registry.lookup(&multi).unwrap();
        let failure = handler
            .validate(&presented, &AnswerValue::List(Vec::new()))
            .unwrap_err();
        assert_eq!(failure.message(), "at least one item is required");
        assert!(handler.validate(&presented, &vec!["mit"].into()).is_ok());
        assert!(handler.validate(&presented, &vec!["bsd"].into()).is_err());

        let select = Field {
            required: true,
            ..license_field()
        };
        let presented = fixture.present(&select).unwrap();
        let handler = registry.lookup(&select).unwrap();
        assert!(handler.validate(&presented, &"".into()).is_err());
        assert!(handler.validate(&presented, &"gpl".into()).is_ok());
        assert!(handler.validate(&presented, &"bsd".into()).is_err());
    }

    #[test]
    fn optional_values_may_be_empty() {
        let registry = FieldTypeRegistry::builtin();
        let fixture = Fixture::new();
        let select = license_field();
        let presented = fixture.present(&select).unwrap();
        assert!(registry
            .lookup(&select)
            .unwrap()
            .validate(&presented, &"".into())
            .is_ok());
    }

    #[test]
    fn answers_must_have_the_kind_shape() {
        let registry = FieldTypeRegistry::builtin();
        let confirm = field("proceed", FieldKind::Confirm);
        let presented = Fixture::new().present(&confirm).unwrap();
        let handler = registry.lookup(&confirm).unwrap();

        assert_eq!(
            handler.to_answer(&presented, true.into()).unwrap(),
            AnswerValue::Bool(true)
        );
        let err = handler.to_answer(&presented, "yes".into()).unwrap_err();
        assert!(matches!(err, SurveyError::InvalidAnswer { .. }));
    }

    #[test]
    fn notes_produce_no_answer() {
        let registry = FieldTypeRegistry::builtin();
        let note = field("intro", FieldKind::Note);
        let handler = registry.lookup(&note).unwrap();
        assert!(!handler.produces_answer());
        assert_eq!(Fixture::new().present(&note).unwrap().initial, None);
    }

    #[test]
    fn unknown_kinds_are_unsupported() {
        let registry = FieldTypeRegistry::builtin();
        let slider = field("volume", FieldKind::Unsupported("slider".to_string()));
        let err = registry.lookup(&slider).map(|_| ()).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::UnsupportedFieldType { ref kind, .. } if kind == "slider"
        ));
        assert!(FieldTypeRegistry::empty()
            .lookup(&field("x", FieldKind::Input))
            .is_err());
    }

    #[test]
    fn registering_replaces_existing_handler() {
        let mut registry = FieldTypeRegistry::builtin();
        registry.register(TextEntryType::input());
        assert_eq!(format!("{registry:?}").matches("Input").count(), 1);
    }
}
