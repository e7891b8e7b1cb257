use std::fmt;

use serde::{Deserialize, Serialize};

use crate::FieldKey;

/// The output destination value that means "write answers to standard output".
pub const STDOUT_SENTINEL: &str = "-";

/// The top-level structure of a survey document.
///
/// A document is an ordered list of forms, each an ordered list of groups,
/// each an ordered list of fields. It is immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyDocument {
    pub name: String,

    #[serde(deserialize_with = "scalar_text")]
    pub version: String,

    pub description: String,
    pub theme: String,
    pub accessible: bool,

    /// Where answers are read from (resume) and written to. Empty or `-` means stdout.
    #[serde(rename = "output", alias = "outputPath")]
    pub output: String,

    pub forms: Vec<Form>,

    /// Show a summary table of all answers once every group is done.
    #[serde(rename = "summary", alias = "showSummary")]
    pub summary: bool,

    /// Final yes/no gate before anything is written.
    #[serde(deserialize_with = "confirm_prompt")]
    pub confirm: Option<ConfirmPrompt>,
}

impl SurveyDocument {
    /// Whether answers go to standard output instead of a file.
    pub fn writes_to_stdout(&self) -> bool {
        self.output.is_empty() || self.output == STDOUT_SENTINEL
    }

    /// All groups of all forms, in document order.
    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.forms.iter().flat_map(|form| form.groups.iter())
    }

    /// All fields of the document, in document order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.groups().flat_map(|group| group.fields.iter())
    }

    /// Keys that appear on more than one field.
    pub fn duplicate_keys(&self) -> Vec<&FieldKey> {
        let mut seen = std::collections::BTreeSet::new();
        let mut duplicates = Vec::new();
        for field in self.fields() {
            if !seen.insert(&field.key) && !duplicates.contains(&&field.key) {
                duplicates.push(&field.key);
            }
        }
        duplicates
    }
}

/// An ordered sequence of groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Form {
    pub groups: Vec<Group>,
}

/// One screen of correlated fields, presented and submitted together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Group {
    pub title: String,
    pub description: String,
    pub fields: Vec<Field>,
}

impl Group {
    /// Fields of this group that produce answers (everything but notes).
    pub fn value_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|field| !field.kind.is_note())
    }

    /// A group without value fields never opens a prompt session.
    pub fn has_value_fields(&self) -> bool {
        self.value_fields().next().is_some()
    }
}

/// A single prompt unit of a survey document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Field {
    pub key: FieldKey,

    #[serde(rename = "type")]
    pub kind: FieldKind,

    pub title: String,
    pub description: String,
    pub required: bool,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub placeholder: String,

    #[serde(skip_serializing_if = "FieldDefault::is_absent")]
    pub default: FieldDefault,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

/// The kind of a field, as named by its `type` in the document.
///
/// Unknown names are kept rather than rejected at load time, so a document
/// with a bad field still renders every group before it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    Note,
    Input,
    Text,
    Select,
    MultiSelect,
    Confirm,
    Unsupported(String),
}

impl FieldKind {
    /// The name used for this kind in documents.
    pub fn name(&self) -> &str {
        match self {
            Self::Note => "note",
            Self::Input => "input",
            Self::Text => "text",
            Self::Select => "select",
            Self::MultiSelect => "multiselect",
            Self::Confirm => "confirm",
            Self::Unsupported(name) => name,
        }
    }

    pub fn is_note(&self) -> bool {
        matches!(self, Self::Note)
    }
}

/// A field without a `type` is not a note; it fails when its group is reached.
impl Default for FieldKind {
    fn default() -> Self {
        Self::Unsupported(String::new())
    }
}

impl From<String> for FieldKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "note" => Self::Note,
            "input" => Self::Input,
            "text" => Self::Text,
            "select" => Self::Select,
            "multiselect" => Self::MultiSelect,
            "confirm" => Self::Confirm,
            _ => Self::Unsupported(name),
        }
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The static default of a field, typed once at load time.
///
/// Documents carry untyped defaults; which variant a field ends up with is
/// decided by the shape of the value, and each field kind only honours the
/// variant it understands.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum FieldDefault {
    #[default]
    Absent,
    /// A string, possibly containing template markers.
    Text(String),
    Flag(bool),
    Set(Vec<String>),
}

impl FieldDefault {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(flag) => Some(*flag),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&[String]> {
        match self {
            Self::Set(items) => Some(items),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for FieldDefault {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::String(text) => Self::Text(text),
            Value::Bool(flag) => Self::Flag(flag),
            Value::Number(number) => Self::Text(number.to_string()),
            Value::Array(items) => Self::Set(
                items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::String(s) => Some(s),
                        Value::Number(n) => Some(n.to_string()),
                        Value::Bool(b) => Some(b.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::Null | Value::Object(_) => Self::Absent,
        }
    }
}

impl From<FieldDefault> for serde_json::Value {
    fn from(default: FieldDefault) -> Self {
        match default {
            FieldDefault::Absent => Self::Null,
            FieldDefault::Text(text) => Self::String(text),
            FieldDefault::Flag(flag) => Self::Bool(flag),
            FieldDefault::Set(items) => Self::Array(items.into_iter().map(Self::String).collect()),
        }
    }
}

/// One choice of a select or multiselect field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct SelectOption {
    /// Label shown to the operator. Falls back to `value` when the document omits it.
    #[serde(rename = "key")]
    pub display_key: String,

    /// Value written to the answers.
    pub value: String,

    #[serde(rename = "selected")]
    pub preselected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            display_key: value.clone(),
            value,
            preselected: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.display_key = label.into();
        self
    }

    pub fn preselected(mut self) -> Self {
        self.preselected = true;
        self
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct RawOption {
    #[serde(alias = "displayKey")]
    key: String,
    value: String,
    #[serde(alias = "preselected")]
    selected: bool,
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        let display_key = if raw.key.is_empty() {
            raw.value.clone()
        } else {
            raw.key
        };
        Self {
            display_key,
            value: raw.value,
            preselected: raw.selected,
        }
    }
}

/// The final confirmation asked before answers are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmPrompt {
    pub title: String,
    pub description: String,
}

/// Accepts any scalar as text, so `version: 1.0` doesn't need quoting.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::String(text) => Ok(text),
        serde_json::Value::Number(number) => Ok(number.to_string()),
        serde_json::Value::Bool(flag) => Ok(flag.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a scalar, found {other}"
        ))),
    }
}

/// A confirmation block with an empty title means "don't ask".
fn confirm_prompt<'de, D>(deserializer: D) -> Result<Option<ConfirmPrompt>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let prompt = Option::<ConfirmPrompt>::deserialize(deserializer)?;
    Ok(prompt.filter(|prompt| !prompt.title.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"
name: scaffold
version: "1.0"
output: answers.json
summary: true
confirm:
  title: Write it?
forms:
  - groups:
      - title: Project
        fields:
          - key: intro
            type: note
            title: Hello
          - key: name
            type: input
            required: true
            default: "{{env.USER}}"
          - key: port
            type: input
            default: 8080
          - key: license
            type: select
            options:
              - value: MIT
              - key: Apache 2.0
                value: Apache-2.0
                selected: true
          - key: langs
            type: multiselect
            default: [rust, go]
          - key: proceed
            type: confirm
            default: false
          - key: mystery
            type: slider
"#;

    fn document() -> SurveyDocument {
        serde_yaml::from_str(DOCUMENT).unwrap()
    }

    #[test]
    fn loads_metadata() {
        let doc = document();
        assert_eq!(doc.name, "scaffold");
        assert_eq!(doc.version, "1.0");
        assert_eq!(doc.output, "answers.json");
        assert!(doc.summary);
        assert!(!doc.writes_to_stdout());
        assert_eq!(doc.confirm.unwrap().title, "Write it?");
    }

    #[test]
    fn kinds_are_parsed_and_unknown_kinds_kept() {
        let kinds: Vec<_> = document().fields().map(|f| f.kind.clone()).collect();
        assert_eq!(
            kinds,
            [
                FieldKind::Note,
                FieldKind::Input,
                FieldKind::Input,
                FieldKind::Select,
                FieldKind::MultiSelect,
                FieldKind::Confirm,
                FieldKind::Unsupported("slider".to_string()),
            ]
        );
    }

    #[test]
    fn defaults_are_typed_at_load_time() {
        let doc = document();
        let defaults: Vec<_> = doc.fields().map(|f| f.default.clone()).collect();
        assert_eq!(defaults[0], FieldDefault::Absent);
        assert_eq!(defaults[1], FieldDefault::Text("{{env.USER}}".to_string()));
        assert_eq!(defaults[2], FieldDefault::Text("8080".to_string()));
        assert_eq!(
            defaults[4],
            FieldDefault::Set(vec!["rust".to_string(), "go".to_string()])
        );
        assert_eq!(defaults[5], FieldDefault::Flag(false));
    }

    #[test]
    fn option_label_falls_back_to_value() {
        let doc = document();
        let license = doc.fields().find(|f| f.key.as_str() == "license").unwrap();
        assert_eq!(license.options[0].display_key, "MIT");
        assert!(!license.options[0].preselected);
        assert_eq!(license.options[1].display_key, "Apache 2.0");
        assert!(license.options[1].preselected);
    }

    #[test]
    fn empty_confirm_title_means_no_confirmation() {
        let doc: SurveyDocument = serde_yaml::from_str("confirm:\n  title: ''\n").unwrap();
        assert!(doc.confirm.is_none());
        assert!(doc.writes_to_stdout());
    }

    #[test]
    fn camel_case_aliases() {
        let doc: SurveyDocument = serde_json::from_str(
            r#"{"outputPath": "-", "showSummary": true,
                "forms": [{"groups": [{"fields": [{"key": "k", "type": "select",
                "options": [{"displayKey": "Yes", "value": "y", "preselected": true}]}]}]}]}"#,
        )
        .unwrap();
        assert!(doc.summary);
        assert!(doc.writes_to_stdout());
        let option = &doc.fields().next().unwrap().options[0];
        assert_eq!(option.display_key, "Yes");
        assert!(option.preselected);
    }

    #[test]
    fn unquoted_version_and_missing_type() {
        let doc: SurveyDocument = serde_yaml::from_str(
            "version: 2.5\nforms:\n  - groups:\n      - fields:\n          - key: k\n",
        )
        .unwrap();
        assert_eq!(doc.version, "2.5");
        assert_eq!(
            doc.fields().next().unwrap().kind,
            FieldKind::Unsupported(String::new())
        );
    }

    #[test]
    fn notes_are_not_value_fields() {
        let doc = document();
        let group = doc.groups().next().unwrap();
        assert_eq!(group.value_fields().count(), 6);
        assert!(group.has_value_fields());
        assert!(!Group::default().has_value_fields());
    }

    #[test]
    fn duplicate_keys_are_reported_once() {
        let doc: SurveyDocument = serde_yaml::from_str(
            "forms:\n  - groups:\n      - fields:\n          - {key: a, type: input}\n          - {key: a, type: input}\n          - {key: a, type: text}\n          - {key: b, type: text}\n",
        )
        .unwrap();
        assert_eq!(doc.duplicate_keys(), [&FieldKey::new("a")]);
    }
}
