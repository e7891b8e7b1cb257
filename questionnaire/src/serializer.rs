//! Writing the final answers.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use questionnaire_types::{Answers, STDOUT_SENTINEL};
use tracing::info;

use crate::{DataFormat, SurveyError};

/// Where the answers end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

impl OutputTarget {
    /// Interpret a document's `output` value. Empty or `-` means stdout.
    pub fn from_output(output: &str) -> Self {
        if output.is_empty() || output == STDOUT_SENTINEL {
            Self::Stdout
        } else {
            Self::File(PathBuf::from(output))
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdout => f.write_str("<stdout>"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Render the answers in the format implied by `destination`'s extension.
///
/// The whole payload is built in memory, so nothing is written if this fails.
pub fn serialize(answers: &Answers, destination: &Path) -> Result<Vec<u8>, SurveyError> {
    let format =
        DataFormat::from_path(destination).ok_or_else(|| SurveyError::UnsupportedFormat {
            path: destination.to_path_buf(),
        })?;
    format
        .encode(answers)
        .map_err(|source| SurveyError::Serialization {
            target: destination.display().to_string(),
            source,
        })
}

/// Write a rendered payload to its target in one go.
///
/// Files are written to a temporary sibling first and then moved over the
/// destination, so readers never see a partial file.
pub fn write(bytes: &[u8], target: &OutputTarget) -> Result<(), SurveyError> {
    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(|err| SurveyError::io("<stdout>", err))?;
        }
        OutputTarget::File(path) => {
            let dir = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            let mut file =
                tempfile::NamedTempFile::new_in(dir).map_err(|err| SurveyError::io(dir, err))?;
            file.write_all(bytes)
                .map_err(|err| SurveyError::io(file.path(), err))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                file.as_file()
                    .set_permissions(std::fs::Permissions::from_mode(0o644))
                    .map_err(|err| SurveyError::io(file.path(), err))?;
            }
            file.persist(path)
                .map_err(|err| SurveyError::io(path, err.error))?;
        }
    }
    info!(%target, bytes = bytes.len(), "wrote answers");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::load_persisted;

    fn answers() -> Answers {
        let mut answers = Answers::new();
        answers.insert("proceed", true);
        answers.insert("name", "Ada");
        answers.insert("langs", vec!["rust", "go"]);
        answers.insert("empty", "");
        answers.insert("tricky", "true");
        answers
    }

    #[test]
    fn json_payload() {
        let mut answers = Answers::new();
        answers.insert("name", "Ada");
        answers.insert("proceed", true);

        let bytes = serialize(&answers, Path::new("out.json")).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"name":"Ada","proceed":true}"#
        );
    }

    #[test]
    fn yaml_payload() {
        let mut answers = Answers::new();
        answers.insert("name", "Ada");
        answers.insert("langs", vec!["rust"]);

        let bytes = serialize(&answers, Path::new("out.yml")).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "langs:\n- rust\nname: Ada\n"
        );
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let err = serialize(&answers(), Path::new("out.txt")).unwrap_err();
        assert!(matches!(err, SurveyError::UnsupportedFormat { .. }));
    }

    #[test]
    fn round_trip_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["answers.json", "answers.yaml", "answers.yml"] {
            let path = dir.path().join(name);
            let target = OutputTarget::File(path.clone());

            write(&serialize(&answers(), &path).unwrap(), &target).unwrap();

            let loaded = load_persisted(path.to_str().unwrap()).unwrap();
            assert_eq!(loaded, answers(), "round trip through {name}");
        }
    }

    #[test]
    fn write_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("answers.json");
        std::fs::write(&path, "old contents that are longer than the new ones").unwrap();

        write(b"{}", &OutputTarget::File(path.clone())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn write_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("answers.json");

        let err = write(b"{}", &OutputTarget::File(path.clone())).unwrap_err();
        assert!(matches!(err, SurveyError::Io { .. }));
        assert!(!path.exists());
    }

    #[test]
    fn target_from_output() {
        assert_eq!(OutputTarget::from_output(""), OutputTarget::Stdout);
        assert_eq!(OutputTarget::from_output("-"), OutputTarget::Stdout);
        assert_eq!(
            OutputTarget::from_output("a.json"),
            OutputTarget::File(PathBuf::from("a.json"))
        );
        assert_eq!(OutputTarget::Stdout.to_string(), "<stdout>");
    }
}
