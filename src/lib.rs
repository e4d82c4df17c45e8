//! Pattern Patch: pattern-based text patching
//!
//! Insert text after or before the matches of a regular expression, or
//! replace the matches outright, and later take `append`/`prepend` patches
//! back out again. Reproducible, scriptable edits to configuration or source
//! files without a diff/patch toolchain.
//!
//! # Architecture
//!
//! The core is two pure functions over an in-memory buffer: [`apply`] and
//! [`revert`]. Both drive the same substitution loop over a [`Cursor`] that
//! resumes searching after each replacement, so inserted text is never
//! matched again. `revert` first derives a reversal pattern that recognizes
//! the patched text (see [`patch::reversal`]).
//!
//! Around the core:
//!
//! - [`config`] loads YAML patch files and merges them with direct arguments
//!   into one [`PatchSpec`]
//! - [`files`] runs a patch over a list of files, writing each one atomically
//!
//! # Example
//!
//! ```
//! use pattern_patch::{Mode, PatchSpec, Pattern};
//!
//! let spec = PatchSpec::new(Pattern::new("</a>").unwrap(), "X").with_mode(Mode::Prepend);
//!
//! let patched = spec.apply("<a></a>").unwrap();
//! assert_eq!(patched, "<a>X</a>");
//! assert_eq!(spec.revert(&patched).unwrap(), "<a></a>");
//! ```

pub mod config;
pub mod files;
pub mod patch;

// Re-exports
pub use config::{load_from_path, load_from_str, resolve, ConfigError, PatchParams, TextSource};
pub use files::{FileError, FileOutcome, FilePatcher};
pub use patch::{
    apply, revert, Cursor, Direction, InvalidMode, Match, Mode, PatchError, PatchSpec, Pattern,
    PatternFlags,
};
