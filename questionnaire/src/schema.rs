//! Loading survey documents.

use std::path::Path;

use questionnaire_types::SurveyDocument;
use tracing::{info, warn};

use crate::{DataFormat, SurveyError};

/// Load a survey document, picking the codec from the file extension.
///
/// Only the structure is checked here. Fields that can't be rendered (an
/// unknown type, a select without options) fail once their group is reached.
pub fn load_document(path: &Path) -> Result<SurveyDocument, SurveyError> {
    let format = DataFormat::from_path(path).ok_or_else(|| SurveyError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let bytes = std::fs::read(path).map_err(|err| SurveyError::io(path, err))?;
    let document: SurveyDocument =
        format
            .decode(&bytes)
            .map_err(|source| SurveyError::Schema {
                path: path.to_path_buf(),
                source,
            })?;

    for key in document.duplicate_keys() {
        warn!(%key, "field key used more than once, the last answer wins");
    }
    if document.fields().any(|field| field.key.is_empty()) {
        warn!("survey document contains fields without a key");
    }

    info!(
        path = %path.display(),
        name = %document.name,
        fields = document.fields().count(),
        "loaded survey document"
    );
    Ok(document)
}
