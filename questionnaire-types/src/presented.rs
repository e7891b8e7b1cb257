use crate::{AnswerValue, Field, FieldKey, FieldKind, Group};

/// Visual theme of a prompt session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    Base,
    Base16,
    #[default]
    Charm,
    Catppuccin,
    Dracula,
}

impl Theme {
    /// Look a theme up by its document name. An empty name is the default theme.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "" | "charm" => Some(Self::Charm),
            "base" => Some(Self::Base),
            "base16" => Some(Self::Base16),
            "catppuccin" => Some(Self::Catppuccin),
            "dracula" => Some(Self::Dracula),
            _ => None,
        }
    }

    /// Whether the theme uses colour at all.
    pub fn is_colored(&self) -> bool {
        !matches!(self, Self::Base)
    }
}

/// How prompt sessions should look.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStyle {
    pub theme: Theme,

    /// Accessible sessions avoid colour and full-screen editors.
    pub accessible: bool,
}

impl SessionStyle {
    pub fn new(theme: Theme, accessible: bool) -> Self {
        Self { theme, accessible }
    }

    /// Whether prompts should be drawn with colour.
    pub fn colored(&self) -> bool {
        self.theme.is_colored() && !self.accessible
    }
}

/// Message shown before the first group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prelude {
    pub title: String,
    pub body: String,
}

/// One choice of a select or multiselect field, ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedOption {
    pub label: String,
    pub value: String,
    pub selected: bool,
}

/// A field with every default already resolved, ready to hand to a backend.
///
/// Backends never look at the document field itself; they show this, collect
/// a value, and return it keyed by `key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresentedField {
    pub key: FieldKey,
    pub kind: FieldKind,
    pub title: String,
    pub description: String,
    pub placeholder: String,
    pub required: bool,

    /// The effective default. `None` for notes.
    pub initial: Option<AnswerValue>,

    pub options: Vec<PresentedOption>,
}

impl PresentedField {
    /// Start a descriptor from the document field, with no default and no options.
    pub fn from_field(field: &Field) -> Self {
        Self {
            key: field.key.clone(),
            kind: field.kind.clone(),
            title: field.title.trim().to_string(),
            description: field.description.trim().to_string(),
            placeholder: field.placeholder.clone(),
            required: field.required,
            initial: None,
            options: Vec::new(),
        }
    }

    /// The initial string value, or empty.
    pub fn initial_text(&self) -> &str {
        self.initial
            .as_ref()
            .and_then(AnswerValue::as_str)
            .unwrap_or_default()
    }

    /// The initial boolean value, or `false`.
    pub fn initial_flag(&self) -> bool {
        self.initial
            .as_ref()
            .and_then(AnswerValue::as_bool)
            .unwrap_or(false)
    }

    /// Index of the first pre-selected option.
    pub fn selected_index(&self) -> Option<usize> {
        self.options.iter().position(|option| option.selected)
    }

    /// Values of all pre-selected options, in option order.
    pub fn selected_values(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| option.selected)
            .map(|option| option.value.clone())
            .collect()
    }

    /// The value a backend should return when the operator accepts the default.
    pub fn accepted_default(&self) -> Option<AnswerValue> {
        match self.kind {
            FieldKind::Note | FieldKind::Unsupported(_) => None,
            FieldKind::Confirm => Some(AnswerValue::Bool(self.initial_flag())),
            FieldKind::MultiSelect => Some(AnswerValue::List(self.selected_values())),
            FieldKind::Select => Some(AnswerValue::String(
                self.selected_index()
                    .map(|idx| self.options[idx].value.clone())
                    .unwrap_or_else(|| self.initial_text().to_string()),
            )),
            FieldKind::Input | FieldKind::Text => {
                Some(AnswerValue::String(self.initial_text().to_string()))
            }
        }
    }
}

/// One group, ready to be shown as a single prompt session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSession {
    pub title: String,
    pub description: String,
    pub fields: Vec<PresentedField>,
    pub style: SessionStyle,
}

/// The answered fields of one group, for the summary table.
#[derive(Debug, Clone, Copy)]
pub struct SummarySection<'a> {
    pub group: &'a Group,
    pub entries: &'a [(&'a Field, &'a AnswerValue)],
}
