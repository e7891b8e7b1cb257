//! Answers persisted by an earlier run, used to pre-fill defaults.

use std::collections::BTreeMap;
use std::path::Path;

use questionnaire_types::{AnswerValue, Answers, STDOUT_SENTINEL};
use tracing::{debug, info, warn};

use crate::{DataFormat, SurveyError};

/// Load the answers of an earlier run from the output destination.
///
/// Resume is off (empty answers) when the destination is standard output or
/// doesn't exist yet. Entries whose shape can't be an answer are skipped.
pub fn load_persisted(output: &str) -> Result<Answers, SurveyError> {
    if output.is_empty() || output == STDOUT_SENTINEL {
        debug!("answers go to stdout, resume disabled");
        return Ok(Answers::new());
    }

    let path = Path::new(output);
    if !path.exists() {
        debug!(path = %path.display(), "no previous answers");
        return Ok(Answers::new());
    }

    let format = DataFormat::from_path(path).ok_or_else(|| SurveyError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let bytes = std::fs::read(path).map_err(|err| SurveyError::io(path, err))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        debug!(path = %path.display(), "previous answer file is empty");
        return Ok(Answers::new());
    }

    let raw: Option<BTreeMap<String, serde_json::Value>> =
        format
            .decode(&bytes)
            .map_err(|source| SurveyError::PersistedAnswers {
                path: path.to_path_buf(),
                source,
            })?;

    let mut answers = Answers::new();
    for (key, value) in raw.unwrap_or_default() {
        match AnswerValue::from_json(&value) {
            Some(answer) => {
                answers.insert(key, answer);
            }
            None => warn!(%key, "ignoring previous answer of unsupported shape"),
        }
    }

    info!(path = %path.display(), answers = answers.len(), "loaded previous answers");
    Ok(answers)
}
