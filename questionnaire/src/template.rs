//! Expansion of templated defaults.
//!
//! Defaults may reference environment variables as `{{env.NAME}}` and answers
//! collected earlier in the same run as `{{answers.KEY}}`. Unknown references
//! expand to nothing.

use std::collections::BTreeMap;

use handlebars::{Handlebars, RenderError};
use questionnaire_types::Answers;
use serde_json::{Map, Value};

/// Snapshot of the host environment visible to templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    /// Capture the variables of the current process.
    ///
    /// Variables whose name or value isn't valid unicode are left out.
    pub fn capture() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    fn to_json(&self) -> Value {
        Value::Object(
            self.vars
                .iter()
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect(),
        )
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// What a template can see: the environment and the answers collected so far.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub environment: &'a Environment,
    pub answers: &'a Answers,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(environment: &'a Environment, answers: &'a Answers) -> Self {
        Self {
            environment,
            answers,
        }
    }

    fn data(&self) -> Value {
        let mut data = Map::new();
        data.insert("env".to_string(), self.environment.to_json());
        data.insert("answers".to_string(), self.answers.to_json());
        Value::Object(data)
    }
}

/// Renders default templates.
pub struct TemplateResolver {
    handlebars: Handlebars<'static>,
}

impl TemplateResolver {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        // Defaults are plain text, not HTML.
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(false);
        Self { handlebars }
    }

    /// Expand a template against the given context.
    pub fn resolve(
        &self,
        template: &str,
        context: &ResolutionContext<'_>,
    ) -> Result<String, RenderError> {
        if template.is_empty() {
            return Ok(String::new());
        }
        self.handlebars.render_template(template, &context.data())
    }
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateResolver").finish_non_exhaustive()
    }
}
