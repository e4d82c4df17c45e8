use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatchError {
    #[error("replace-mode patches cannot be reverted")]
    UnsupportedModeForRevert,

    #[error("invalid offset {offset} for buffer of length {len}")]
    InvalidOffset { offset: usize, len: usize },

    #[error("failed to compile reversal pattern: {0}")]
    ReversalPattern(#[from] regex::Error),
}

/// A mode string that is not one of `append`, `prepend` or `replace`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid mode '{value}': expected append, prepend or replace")]
pub struct InvalidMode {
    pub value: String,
}
