//! Compiled patterns that remember how they were compiled.

use regex::{Regex, RegexBuilder};
use std::fmt;

/// Matching options a [`Pattern`] was compiled with.
///
/// A compiled `Regex` does not expose the options given to its builder.
/// Reverting builds a larger pattern around the original source, so the
/// options travel with the pattern and are re-applied inline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternFlags {
    pub case_insensitive: bool,
    /// `^` and `$` match at line boundaries
    pub multi_line: bool,
    pub dot_matches_new_line: bool,
    pub ignore_whitespace: bool,
    pub swap_greed: bool,
}

impl PatternFlags {
    /// Only `multi_line` set.
    pub fn line_anchored() -> Self {
        Self {
            multi_line: true,
            ..Self::default()
        }
    }

    fn letters(&self) -> String {
        [
            (self.case_insensitive, 'i'),
            (self.multi_line, 'm'),
            (self.dot_matches_new_line, 's'),
            (self.ignore_whitespace, 'x'),
            (self.swap_greed, 'U'),
        ]
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, letter)| *letter)
        .collect()
    }

    /// `source` as a non-capturing group with these flags set inline, so it
    /// matches the same text inside a pattern compiled without them.
    pub fn scoped(&self, source: &str) -> String {
        let letters = self.letters();
        if self.ignore_whitespace {
            // A trailing `#` comment would swallow the closing paren
            format!("(?{letters}:{source}\n)")
        } else {
            format!("(?{letters}:{source})")
        }
    }
}

/// A compiled regular expression together with its [`PatternFlags`].
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    flags: PatternFlags,
}

impl Pattern {
    /// Compile with default options.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Self::with_flags(source, PatternFlags::default())
    }

    /// Compile so `^` and `$` match at line boundaries.
    pub fn line_anchored(source: &str) -> Result<Self, regex::Error> {
        Self::with_flags(source, PatternFlags::line_anchored())
    }

    pub fn with_flags(source: &str, flags: PatternFlags) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(flags.case_insensitive)
            .multi_line(flags.multi_line)
            .dot_matches_new_line(flags.dot_matches_new_line)
            .ignore_whitespace(flags.ignore_whitespace)
            .swap_greed(flags.swap_greed)
            .build()?;
        Ok(Self { regex, flags })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn flags(&self) -> PatternFlags {
        self.flags
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_without_flags_is_plain_group() {
        assert_eq!(PatternFlags::default().scoped("a|b"), "(?:a|b)");
    }

    #[test]
    fn test_scoped_carries_flags() {
        let flags = PatternFlags {
            case_insensitive: true,
            dot_matches_new_line: true,
            ..PatternFlags::line_anchored()
        };
        assert_eq!(flags.scoped("^a.b"), "(?ims:^a.b)");
    }

    #[test]
    fn test_scoped_whitespace_mode_closes_comment() {
        let flags = PatternFlags {
            ignore_whitespace: true,
            ..PatternFlags::default()
        };
        let scoped = flags.scoped("foo # trailing note");
        assert_eq!(scoped, "(?x:foo # trailing note\n)");
        let re = Regex::new(&format!("{scoped}!")).unwrap();
        assert!(re.is_match("foo!"));
    }

    #[test]
    fn test_builder_options_are_applied() {
        let flags = PatternFlags {
            case_insensitive: true,
            ..PatternFlags::default()
        };
        let pattern = Pattern::with_flags("foo", flags).unwrap();
        assert!(pattern.regex().is_match("FOO"));
        assert_eq!(pattern.flags(), flags);
        assert_eq!(pattern.to_string(), "foo");
    }

    #[test]
    fn test_line_anchored() {
        let pattern = Pattern::line_anchored("^b$").unwrap();
        assert!(pattern.regex().is_match("a\nb\nc"));
        assert!(!Pattern::new("^b$").unwrap().regex().is_match("a\nb\nc"));
    }

    #[test]
    fn test_invalid_source() {
        assert!(Pattern::new("(unclosed").is_err());
    }
}
