use std::path::PathBuf;

use clap::Parser;
use questionnaire::SurveyDocument;

#[derive(Parser, Debug)]
#[command(
    name = "questionnaire",
    version,
    about = "Ask the questions of a YAML or JSON survey and save the answers"
)]
pub struct Cli {
    /// Survey document to run
    #[arg(default_value = "survey.yaml")]
    pub schema: PathBuf,

    /// Where to write the answers, `-` for stdout. Overrides the document.
    #[arg(long, short)]
    pub output: Option<String>,

    /// Plain prompts without colour or full-screen editors
    #[arg(long, default_value_t = false)]
    pub accessible: bool,

    /// Prompt theme: base, base16, charm, catppuccin or dracula
    #[arg(long)]
    pub theme: Option<String>,

    /// Skip the summary of answers before writing them
    #[arg(long, default_value_t = false)]
    pub no_summary: bool,
}

impl Cli {
    /// Apply command line overrides to a loaded document.
    pub fn apply(&self, document: &mut SurveyDocument) {
        if let Some(output) = &self.output {
            document.output = output.clone();
        }
        if let Some(theme) = &self.theme {
            document.theme = theme.clone();
        }
        if self.accessible {
            document.accessible = true;
        }
        if self.no_summary {
            document.summary = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_survey_yaml() {
        let cli = Cli::parse_from(["questionnaire"]);
        assert_eq!(cli.schema, PathBuf::from("survey.yaml"));
        assert!(cli.output.is_none());
    }

    #[test]
    fn flags_override_the_document() {
        let cli = Cli::parse_from([
            "questionnaire",
            "setup.json",
            "--output",
            "-",
            "--theme",
            "dracula",
            "--accessible",
            "--no-summary",
        ]);
        let mut document = SurveyDocument {
            output: "answers.yaml".to_string(),
            summary: true,
            ..SurveyDocument::default()
        };

        cli.apply(&mut document);

        assert_eq!(cli.schema, PathBuf::from("setup.json"));
        assert_eq!(document.output, "-");
        assert_eq!(document.theme, "dracula");
        assert!(document.accessible);
        assert!(!document.summary);
    }

    #[test]
    fn absent_flags_leave_the_document_alone() {
        let cli = Cli::parse_from(["questionnaire", "setup.yaml"]);
        let mut document = SurveyDocument {
            output: "answers.yaml".to_string(),
            theme: "base".to_string(),
            summary: true,
            ..SurveyDocument::default()
        };

        cli.apply(&mut document);

        assert_eq!(document.output, "answers.yaml");
        assert_eq!(document.theme, "base");
        assert!(document.summary);
    }
}
