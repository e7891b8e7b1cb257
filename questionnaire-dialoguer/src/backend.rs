//! Dialoguer backend implementation for SurveyBackend trait.

use dialoguer::theme::{ColorfulTheme, SimpleTheme, Theme};
use dialoguer::{Confirm, Editor, FuzzySelect, Input, MultiSelect, Select};
use questionnaire::{
    AnswerValue, ConfirmPrompt, FieldKind, GroupSession, Prelude, PresentedField,
    SessionError, SessionStyle, SummarySection, SurveyBackend, ValidationFailure,
};
use thiserror::Error;
use tracing::debug;

/// Error type for the Dialoguer backend.
#[derive(Debug, Error)]
pub enum DialoguerError {
    /// User cancelled the survey (e.g., pressed Ctrl+C or Escape).
    #[error("Survey cancelled by user")]
    Cancelled,

    /// An I/O error occurred during prompting.
    #[error("Dialoguer error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// A select field with nothing to choose from.
    #[error("field '{0}' has no options to choose from")]
    NoOptions(String),
}

impl From<DialoguerError> for SessionError {
    fn from(err: DialoguerError) -> Self {
        match err {
            DialoguerError::Cancelled => SessionError::Cancelled,
            other => SessionError::backend(other),
        }
    }
}

/// Helper to check if a dialoguer error is a cancellation (Ctrl+C / Escape)
fn is_cancelled(err: &dialoguer::Error) -> bool {
    matches!(err, dialoguer::Error::IO(io_err) if io_err.kind() == std::io::ErrorKind::Interrupted)
}

fn prompt_error(err: dialoguer::Error) -> DialoguerError {
    if is_cancelled(&err) {
        DialoguerError::Cancelled
    } else {
        DialoguerError::Dialoguer(err)
    }
}

type Validate<'a> = &'a dyn Fn(usize, &AnswerValue) -> Result<(), ValidationFailure>;

/// Selects with more options than this get a type-to-filter prompt.
const FUZZY_SEARCH_THRESHOLD: usize = 10;

/// Dialoguer backend for interactive CLI prompts.
///
/// Each group is shown as a heading followed by one prompt per field. Values
/// rejected by a field's rule are reported and asked again.
#[derive(Debug, Default, Clone)]
pub struct DialoguerBackend;

impl DialoguerBackend {
    pub fn new() -> Self {
        Self
    }

    fn theme(style: &SessionStyle) -> Box<dyn Theme> {
        if style.colored() {
            Box::new(ColorfulTheme::default())
        } else {
            Box::new(SimpleTheme)
        }
    }

    fn ask_field(
        &self,
        position: usize,
        field: &PresentedField,
        style: &SessionStyle,
        validate: Validate<'_>,
    ) -> Result<Option<AnswerValue>, DialoguerError> {
        let theme = Self::theme(style);
        let theme = theme.as_ref();

        loop {
            let value = match &field.kind {
                FieldKind::Note => {
                    show_note(field);
                    return Ok(None);
                }
                FieldKind::Input => ask_input(theme, field)?,
                FieldKind::Text if style.accessible => ask_input(theme, field)?,
                FieldKind::Text => ask_editor(field)?,
                FieldKind::Select => ask_select(theme, field)?,
                FieldKind::MultiSelect => ask_multiselect(theme, field)?,
                FieldKind::Confirm => ask_confirm(theme, field)?,
                FieldKind::Unsupported(kind) => {
                    debug!(key = %field.key, %kind, "skipping unsupported field");
                    return Ok(None);
                }
            };

            match validate(position, &value) {
                Ok(()) => return Ok(Some(value)),
                Err(failure) => println!("Error: {failure}"),
            }
        }
    }
}

fn show_note(field: &PresentedField) {
    if !field.title.is_empty() {
        println!("{}", field.title);
    }
    if !field.description.is_empty() {
        println!("{}", field.description);
    }
    println!();
}

fn prompt_text(field: &PresentedField) -> String {
    let title = if field.title.is_empty() {
        field.key.as_str()
    } else {
        field.title.as_str()
    };
    if field.description.is_empty() {
        title.to_string()
    } else {
        format!("{title} ({})", field.description)
    }
}

fn ask_input(theme: &dyn Theme, field: &PresentedField) -> Result<AnswerValue, DialoguerError> {
    let initial = field.initial_text();
    let mut prompt = prompt_text(field);
    if initial.is_empty() && !field.placeholder.is_empty() {
        prompt = format!("{prompt} [e.g. {}]", field.placeholder);
    }

    let mut builder = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true);
    match prefill(field) {
        Prefill::Default(text) => builder = builder.default(text),
        Prefill::Editable(text) => builder = builder.with_initial_text(text),
        Prefill::Empty => {}
    }

    let value = builder.interact_text().map_err(prompt_error)?;
    Ok(AnswerValue::String(value))
}

/// How an input prompt starts out.
#[derive(Debug, PartialEq, Eq)]
enum Prefill {
    /// Returned on a bare Enter. Used for required fields, which can't be
    /// cleared anyway.
    Default(String),

    /// Typed into the line, so the operator can erase it.
    Editable(String),

    Empty,
}

fn prefill(field: &PresentedField) -> Prefill {
    let initial = field.initial_text();
    if initial.is_empty() {
        Prefill::Empty
    } else if field.required {
        Prefill::Default(initial.to_string())
    } else {
        Prefill::Editable(initial.to_string())
    }
}

fn ask_editor(field: &PresentedField) -> Result<AnswerValue, DialoguerError> {
    println!("{}", prompt_text(field));

    let edited = Editor::new()
        .edit(field.initial_text())
        .map_err(dialoguer::Error::from)
        .map_err(prompt_error)?;

    // An aborted editor keeps what was there before.
    let value = edited.unwrap_or_else(|| field.initial_text().to_string());
    Ok(AnswerValue::String(value.trim_end_matches('\n').to_string()))
}

fn ask_select(theme: &dyn Theme, field: &PresentedField) -> Result<AnswerValue, DialoguerError> {
    if field.options.is_empty() {
        return Err(DialoguerError::NoOptions(field.key.to_string()));
    }
    let labels: Vec<&str> = field.options.iter().map(|o| o.label.as_str()).collect();

    let default = field.selected_index().unwrap_or(0);

    let index = if uses_fuzzy_search(field) {
        FuzzySelect::with_theme(theme)
            .with_prompt(prompt_text(field))
            .items(&labels)
            .default(default)
            .interact()
    } else {
        Select::with_theme(theme)
            .with_prompt(prompt_text(field))
            .items(&labels)
            .default(default)
            .interact()
    }
    .map_err(prompt_error)?;

    Ok(AnswerValue::String(field.options[index].value.clone()))
}

fn uses_fuzzy_search(field: &PresentedField) -> bool {
    field.options.len() > FUZZY_SEARCH_THRESHOLD
}

fn ask_multiselect(
    theme: &dyn Theme,
    field: &PresentedField,
) -> Result<AnswerValue, DialoguerError> {
    if field.options.is_empty() {
        return Err(DialoguerError::NoOptions(field.key.to_string()));
    }
    let labels: Vec<&str> = field.options.iter().map(|o| o.label.as_str()).collect();
    let defaults: Vec<bool> = field.options.iter().map(|o| o.selected).collect();

    let indices = MultiSelect::with_theme(theme)
        .with_prompt(prompt_text(field))
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .map_err(prompt_error)?;

    let values = indices
        .into_iter()
        .map(|index| field.options[index].value.clone())
        .collect();
    Ok(AnswerValue::List(values))
}

fn ask_confirm(theme: &dyn Theme, field: &PresentedField) -> Result<AnswerValue, DialoguerError> {
    let value = Confirm::with_theme(theme)
        .with_prompt(prompt_text(field))
        .default(field.initial_flag())
        .interact()
        .map_err(prompt_error)?;
    Ok(AnswerValue::Bool(value))
}

impl SurveyBackend for DialoguerBackend {
    type Error = DialoguerError;

    fn prelude(&self, prelude: &Prelude, _style: &SessionStyle) -> Result<(), Self::Error> {
        if !prelude.title.is_empty() {
            println!("{}", prelude.title);
            println!();
        }
        if !prelude.body.is_empty() {
            println!("{}", prelude.body);
            println!();
        }
        Ok(())
    }

    fn collect_group(
        &self,
        session: &GroupSession,
        validate: &dyn Fn(usize, &AnswerValue) -> Result<(), ValidationFailure>,
    ) -> Result<Vec<Option<AnswerValue>>, Self::Error> {
        if !session.title.is_empty() {
            println!("== {} ==", session.title);
        }
        if !session.description.is_empty() {
            println!("{}", session.description);
        }
        println!();

        let mut values = Vec::with_capacity(session.fields.len());
        for (position, field) in session.fields.iter().enumerate() {
            values.push(self.ask_field(position, field, &session.style, validate)?);
        }
        println!();
        Ok(values)
    }

    fn summarize(
        &self,
        sections: &[SummarySection<'_>],
        _style: &SessionStyle,
    ) -> Result<(), Self::Error> {
        for section in sections {
            let rows: Vec<[String; 3]> = section
                .entries
                .iter()
                .map(|(field, value)| {
                    let question = if field.title.trim().is_empty() {
                        field.key.to_string()
                    } else {
                        field.title.trim().to_string()
                    };
                    [question, value.to_string(), field.key.to_string()]
                })
                .collect();
            if !section.group.title.trim().is_empty() {
                println!("{}", section.group.title.trim());
            }
            print!("{}", render_table(["Question", "Answer", "Key"], &rows));
            println!();
        }
        Ok(())
    }

    fn confirm(&self, prompt: &ConfirmPrompt, style: &SessionStyle) -> Result<bool, Self::Error> {
        if !prompt.description.is_empty() {
            println!("{}", prompt.description);
        }
        let theme = Self::theme(style);
        Confirm::with_theme(theme.as_ref())
            .with_prompt(prompt.title.as_str())
            .default(true)
            .interact()
            .map_err(prompt_error)
    }
}

/// Lay out rows under a header, each column as wide as its widest cell.
fn render_table(header: [&str; 3], rows: &[[String; 3]]) -> String {
    let mut widths = header.map(|cell| cell.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 3]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(header);
    out.push_str(&line(widths.map(|width| "-".repeat(width)).each_ref().map(String::as_str)));
    for row in rows {
        out.push_str(&line(row.each_ref().map(String::as_str)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use questionnaire::{Field, FieldKind, PresentedOption, Theme};

    fn input(required: bool, initial: &str) -> PresentedField {
        let mut field = PresentedField::from_field(&Field {
            key: "repo".into(),
            kind: FieldKind::Input,
            required,
            ..Field::default()
        });
        field.initial = Some(AnswerValue::from(initial));
        field
    }

    #[test]
    fn optional_input_can_be_cleared() {
        assert_eq!(
            prefill(&input(false, "github.com/ada")),
            Prefill::Editable("github.com/ada".to_string())
        );
        assert_eq!(
            prefill(&input(true, "github.com/ada")),
            Prefill::Default("github.com/ada".to_string())
        );
        assert_eq!(prefill(&input(false, "")), Prefill::Empty);
    }

    #[test]
    fn long_selects_are_searchable() {
        let mut field = PresentedField::from_field(&Field {
            key: "country".into(),
            kind: FieldKind::Select,
            ..Field::default()
        });
        field.options = (0..FUZZY_SEARCH_THRESHOLD)
            .map(|n| PresentedOption {
                label: format!("Option {n}"),
                value: n.to_string(),
                selected: false,
            })
            .collect();
        assert!(!uses_fuzzy_search(&field));

        field.options.push(PresentedOption {
            label: "One more".to_string(),
            value: "more".to_string(),
            selected: false,
        });
        assert!(uses_fuzzy_search(&field));
    }

    #[test]
    fn error_types() {
        let err = DialoguerError::Cancelled;
        assert_eq!(err.to_string(), "Survey cancelled by user");

        let err = DialoguerError::NoOptions("license".to_string());
        assert_eq!(err.to_string(), "field 'license' has no options to choose from");
    }

    #[test]
    fn cancellation_maps_to_session_cancel() {
        let interrupted = dialoguer::Error::IO(std::io::Error::from(
            std::io::ErrorKind::Interrupted,
        ));
        assert!(SessionError::from(prompt_error(interrupted)).is_cancelled());

        let broken = dialoguer::Error::IO(std::io::Error::from(std::io::ErrorKind::BrokenPipe));
        assert!(!SessionError::from(prompt_error(broken)).is_cancelled());
    }

    #[test]
    fn prompt_falls_back_to_key() {
        let field = PresentedField::from_field(&Field {
            key: "repo".into(),
            kind: FieldKind::Input,
            ..Field::default()
        });
        assert_eq!(prompt_text(&field), "repo");

        let field = PresentedField::from_field(&Field {
            key: "repo".into(),
            kind: FieldKind::Input,
            title: "Repository".to_string(),
            description: "where the code lives".to_string(),
            ..Field::default()
        });
        assert_eq!(prompt_text(&field), "Repository (where the code lives)");
    }

    #[test]
    fn empty_select_is_an_error() {
        let field = PresentedField::from_field(&Field {
            key: "license".into(),
            kind: FieldKind::Select,
            ..Field::default()
        });
        let err = ask_select(&SimpleTheme, &field).unwrap_err();
        assert!(matches!(err, DialoguerError::NoOptions(key) if key == "license"));
    }

    #[test]
    fn table_columns_are_aligned() {
        let rows = [
            ["Name".to_string(), "Ada".to_string(), "name".to_string()],
            ["Languages".to_string(), "[rust go]".to_string(), "langs".to_string()],
        ];
        let table = render_table(["Question", "Answer", "Key"], &rows);
        assert_eq!(
            table,
            "Question   Answer     Key\n\
             ---------  ---------  -----\n\
             Name       Ada        name\n\
             Languages  [rust go]  langs\n"
        );
    }

    #[test]
    fn accessible_sessions_are_plain() {
        assert!(SessionStyle::new(Theme::Dracula, false).colored());
        assert!(!SessionStyle::new(Theme::Dracula, true).colored());
        assert!(!SessionStyle::new(Theme::Base, false).colored());
    }
}
