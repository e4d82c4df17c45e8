//! Merging parameter layers into one patch.

use crate::config::loader::ConfigError;
use crate::config::schema::{PatchParams, TextSource};
use crate::patch::{PatchSpec, Pattern};
use std::fs;

/// Merge a patch-file layer with directly supplied parameters.
///
/// Every field set in `direct` wins over the same field in `file`. The text
/// counts as one field whether it is given inline or as a file.
pub fn resolve(file: PatchParams, direct: PatchParams) -> PatchParams {
    PatchParams {
        regexp: direct.regexp.or(file.regexp),
        text: direct.text.or(file.text),
        mode: direct.mode.or(file.mode),
        global: direct.global.or(file.global),
        offset: direct.offset.or(file.offset),
    }
}

impl PatchParams {
    /// Validate the merged parameters and build the patch.
    ///
    /// Both `regexp` and some form of text are required. The pattern is
    /// compiled so `^` and `$` match at line boundaries. Remaining fields
    /// default to append, non-global, offset 0.
    pub fn into_spec(self) -> Result<PatchSpec, ConfigError> {
        let regexp = self
            .regexp
            .ok_or(ConfigError::MissingRequiredField { field: "regexp" })?;
        let text = self
            .text
            .ok_or(ConfigError::MissingRequiredField { field: "text" })?;

        let pattern =
            Pattern::line_anchored(&regexp).map_err(|source| ConfigError::InvalidRegex {
                pattern: regexp.clone(),
                source,
            })?;

        let text = match text {
            TextSource::Inline(text) => text,
            TextSource::File(path) => {
                fs::read_to_string(&path).map_err(|source| ConfigError::Io { path, source })?
            }
        };

        Ok(PatchSpec {
            pattern,
            text,
            mode: self.mode.unwrap_or_default(),
            global: self.global.unwrap_or(false),
            offset: self.offset.unwrap_or(0),
        })
    }
}
