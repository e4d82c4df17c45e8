use crate::config::schema::{PatchFile, PatchParams, TextSource};
use crate::patch::InvalidMode;
use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Yaml {
        path: Option<PathBuf>,
        source: serde_yaml::Error,
    },
    InvalidMode {
        path: Option<PathBuf>,
        source: InvalidMode,
    },
    InvalidRegex {
        pattern: String,
        source: regex::Error,
    },
    MissingRequiredField {
        field: &'static str,
    },
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        let path = path.to_path_buf();
        match self {
            ConfigError::Yaml { path: None, source } => ConfigError::Yaml {
                path: Some(path),
                source,
            },
            ConfigError::InvalidMode { path: None, source } => ConfigError::InvalidMode {
                path: Some(path),
                source,
            },
            other => other,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ConfigError::Yaml { path, source } => match path {
                Some(path) => write!(
                    f,
                    "failed to parse patch file YAML ({}): {}",
                    path.display(),
                    source
                ),
                None => write!(f, "failed to parse patch file YAML: {}", source),
            },
            ConfigError::InvalidMode { path, source } => match path {
                Some(path) => write!(f, "invalid patch file ({}): {}", path.display(), source),
                None => write!(f, "{}", source),
            },
            ConfigError::InvalidRegex { pattern, source } => {
                write!(f, "invalid regexp /{}/: {}", pattern, source)
            }
            ConfigError::MissingRequiredField { field } => write!(
                f,
                "must specify '{}' either in a patch file or via arguments",
                field
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Yaml { source, .. } => Some(source),
            ConfigError::InvalidMode { source, .. } => Some(source),
            ConfigError::InvalidRegex { source, .. } => Some(source),
            ConfigError::MissingRequiredField { .. } => None,
        }
    }
}

/// Parse a YAML patch description into a parameter layer.
pub fn load_from_str(input: &str) -> Result<PatchParams, ConfigError> {
    let file: PatchFile =
        serde_yaml::from_str(input).map_err(|source| ConfigError::Yaml { path: None, source })?;
    PatchParams::try_from(file).map_err(|source| ConfigError::InvalidMode { path: None, source })
}

/// Load a YAML patch file.
///
/// A relative `text_file` is taken relative to the patch file's directory.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<PatchParams, ConfigError> {
    let path = path.as_ref();
    debug!("loading patch file {}", path.display());

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut params = load_from_str(&contents).map_err(|error| error.with_path(path))?;

    if let Some(TextSource::File(text_file)) = &params.text {
        if text_file.is_relative() {
            if let Some(dir) = path.parent() {
                params.text = Some(TextSource::File(dir.join(text_file)));
            }
        }
    }

    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::Mode;

    #[test]
    fn test_load_all_keys() {
        let yaml = r#"
regexp: '^\s*</application>'
text: "<meta-data />\n"
mode: prepend
global: true
"#;
        let params = load_from_str(yaml).unwrap();
        assert_eq!(params.regexp.as_deref(), Some(r"^\s*</application>"));
        assert_eq!(
            params.text,
            Some(TextSource::Inline("<meta-data />\n".to_string()))
        );
        assert_eq!(params.mode, Some(Mode::Prepend));
        assert_eq!(params.global, Some(true));
        assert_eq!(params.offset, None);
    }

    #[test]
    fn test_all_keys_optional() {
        let params = load_from_str("regexp: foo\n").unwrap();
        assert_eq!(params.regexp.as_deref(), Some("foo"));
        assert_eq!(params.text, None);
        assert_eq!(params.mode, None);
        assert_eq!(params.global, None);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = load_from_str("regex: foo\n").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { path: None, .. }));
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let err = load_from_str("mode: sideways\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMode { .. }));
        assert!(err.to_string().contains("sideways"));
    }

    #[test]
    fn test_load_from_path_reports_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let patch = temp_dir.path().join("patch.yaml");
        fs::write(&patch, "mode: [not, a, string]\n").unwrap();

        let err = load_from_path(&patch).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { path: Some(_), .. }));
        assert!(err.to_string().contains("patch.yaml"));
    }

    #[test]
    fn test_missing_patch_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_from_path(temp_dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_relative_text_file_follows_patch_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let patch = temp_dir.path().join("patch.yaml");
        fs::write(&patch, "regexp: foo\ntext_file: snippet.txt\n").unwrap();

        let params = load_from_path(&patch).unwrap();
        assert_eq!(
            params.text,
            Some(TextSource::File(temp_dir.path().join("snippet.txt")))
        );
    }
}
