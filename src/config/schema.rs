use crate::patch::{InvalidMode, Mode};
use serde::Deserialize;
use std::path::PathBuf;

/// On-disk patch description.
///
/// ```yaml
/// regexp: '^\s*</application>'
/// text: "    <meta-data android:name=\"foo\" />\n"
/// mode: prepend
/// global: false
/// ```
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PatchFile {
    #[serde(default)]
    pub regexp: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// Read the patch text from this file when `text` is absent
    #[serde(default)]
    pub text_file: Option<PathBuf>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub global: Option<bool>,
}

/// Where the patch text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSource {
    Inline(String),
    File(PathBuf),
}

/// One layer of patch parameters, every field optional.
///
/// Layers are merged with [`resolve`](crate::config::resolve) and turned into
/// a [`PatchSpec`](crate::PatchSpec) with
/// [`into_spec`](PatchParams::into_spec).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchParams {
    pub regexp: Option<String>,
    pub text: Option<TextSource>,
    pub mode: Option<Mode>,
    pub global: Option<bool>,
    pub offset: Option<usize>,
}

impl TryFrom<PatchFile> for PatchParams {
    type Error = InvalidMode;

    fn try_from(file: PatchFile) -> Result<Self, Self::Error> {
        let mode = file.mode.as_deref().map(str::parse::<Mode>).transpose()?;
        let text = match (file.text, file.text_file) {
            (Some(text), _) => Some(TextSource::Inline(text)),
            (None, Some(path)) => Some(TextSource::File(path)),
            (None, None) => None,
        };

        Ok(Self {
            regexp: file.regexp,
            text,
            mode,
            global: file.global,
            offset: None,
        })
    }
}
