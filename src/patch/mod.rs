pub mod apply;
pub mod cursor;
pub mod errors;
pub mod mode;
pub mod pattern;
pub mod reversal;

pub use apply::apply;
pub use cursor::{Cursor, Match};
pub use errors::{InvalidMode, PatchError};
pub use mode::{Direction, Mode};
pub use pattern::{Pattern, PatternFlags};
pub use reversal::{revert, reversal_pattern, reversal_source};

/// One fully resolved patch: what to look for, what to insert and how.
#[derive(Debug, Clone)]
pub struct PatchSpec {
    pub pattern: Pattern,
    pub text: String,
    pub mode: Mode,
    pub global: bool,
    /// Byte offset at which searching begins
    pub offset: usize,
}

impl PatchSpec {
    /// Single-match append patch starting at offset 0.
    pub fn new(pattern: Pattern, text: impl Into<String>) -> Self {
        Self {
            pattern,
            text: text.into(),
            mode: Mode::default(),
            global: false,
            offset: 0,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn apply(&self, buffer: &str) -> Result<String, PatchError> {
        apply(
            buffer,
            &self.pattern,
            &self.text,
            self.global,
            self.mode,
            self.offset,
        )
    }

    pub fn revert(&self, buffer: &str) -> Result<String, PatchError> {
        revert(
            buffer,
            &self.pattern,
            &self.text,
            self.global,
            self.mode,
            self.offset,
        )
    }

    pub fn run(&self, direction: Direction, buffer: &str) -> Result<String, PatchError> {
        match direction {
            Direction::Apply => self.apply(buffer),
            Direction::Revert => self.revert(buffer),
        }
    }
}
