use crate::patch::errors::InvalidMode;
use std::fmt;
use std::str::FromStr;

/// How the patch text relates to each match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Insert the text after the match
    #[default]
    Append,
    /// Insert the text before the match
    Prepend,
    /// Substitute the text for the match
    Replace,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Append => "append",
            Mode::Prepend => "prepend",
            Mode::Replace => "replace",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `append`, `prepend` and `replace`, optionally in symbol form
/// (`:prepend`) as older patch files spell them.
impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix(':').unwrap_or(name);
        match name.to_ascii_lowercase().as_str() {
            "append" => Ok(Mode::Append),
            "prepend" => Ok(Mode::Prepend),
            "replace" => Ok(Mode::Replace),
            _ => Err(InvalidMode {
                value: s.to_string(),
            }),
        }
    }
}

/// Whether a patch is being applied or taken back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Apply,
    Revert,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Apply => f.write_str("apply"),
            Direction::Revert => f.write_str("revert"),
        }
    }
}
