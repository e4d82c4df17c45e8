//! Reversal patterns: recognizing text that a previous apply produced.
//!
//! Reverting an `append` or `prepend` patch searches for the original pattern
//! with the inserted text spliced next to it, then keeps only the part the
//! original pattern matched. The original pattern sits in a named group with
//! its flags set inline, the inserted text is matched literally and exactly.
//! A line anchor on the inserted side of the original pattern no longer lines
//! up once text sits between it and the line boundary, so it moves to the far
//! side of the text:
//!
//! | mode    | anchor           | reversal pattern                      |
//! |---------|------------------|---------------------------------------|
//! | append  | none             | `(src)` `text`                        |
//! | append  | trailing `$`     | `(src without $)` `text` `(?m:$)`     |
//! | prepend | none             | `text` `(src)`                        |
//! | prepend | leading `^`      | `(?m:^)` `text` `(src without ^)`     |
//!
//! Only a `^` that is the first character or an unescaped `$` that is the
//! last one counts as an anchor, and only when the pattern has no top-level
//! alternation. `^a|b` anchors one branch, not the whole pattern, so it takes
//! the no-anchor row. Reverting a match of its anchored branch then finds
//! nothing and leaves the buffer as it is.

use crate::patch::apply::substitute;
use crate::patch::errors::PatchError;
use crate::patch::mode::Mode;
use crate::patch::pattern::{Pattern, PatternFlags};
use log::debug;
use regex::Regex;

/// Capture group holding what the original pattern matched.
const ORIGINAL: &str = "original";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    Absent,
    Present,
}

/// Take a previous [`apply`](crate::apply) back out of `buffer`.
///
/// Pass the same arguments the patch was applied with. Only `append` and
/// `prepend` patches can be reverted. If the patched text cannot be found the
/// buffer is returned unchanged.
pub fn revert(
    buffer: &str,
    pattern: &Pattern,
    text: &str,
    global: bool,
    mode: Mode,
    offset: usize,
) -> Result<String, PatchError> {
    let reversal = reversal_pattern(pattern, text, mode)?;
    debug!("reverting with /{}/", reversal.as_str());

    substitute(buffer, &reversal, global, offset, |found| {
        reversal
            .captures_at(found.haystack(), found.start)
            .and_then(|caps| caps.name(ORIGINAL))
            .map_or_else(|| found.matched_text(), |original| original.as_str())
            .to_string()
    })
}

/// Compile the pattern that matches `pattern` after `text` was inserted
/// with `mode`.
pub fn reversal_pattern(pattern: &Pattern, text: &str, mode: Mode) -> Result<Regex, PatchError> {
    let source = reversal_source(pattern.as_str(), pattern.flags(), text, mode)?;
    Ok(Regex::new(&source)?)
}

/// Source text of the reversal pattern, before compilation.
///
/// `flags` are the ones `pattern_source` was compiled with. The result is
/// meant to be compiled without any.
pub fn reversal_source(
    pattern_source: &str,
    flags: PatternFlags,
    text: &str,
    mode: Mode,
) -> Result<String, PatchError> {
    let literal = regex::escape(text);
    let original = |source: &str| format!("(?P<{ORIGINAL}>{})", flags.scoped(source));

    let source = match (mode, anchor(pattern_source, flags, mode)) {
        (Mode::Append, Anchor::Absent) => format!("{}{literal}", original(pattern_source)),
        (Mode::Append, Anchor::Present) => {
            let stripped = &pattern_source[..pattern_source.len() - 1];
            format!("{}{literal}(?m:$)", original(stripped))
        }
        (Mode::Prepend, Anchor::Absent) => format!("{literal}{}", original(pattern_source)),
        (Mode::Prepend, Anchor::Present) => {
            let stripped = &pattern_source[1..];
            format!("(?m:^){literal}{}", original(stripped))
        }
        (Mode::Replace, _) => return Err(PatchError::UnsupportedModeForRevert),
    };

    Ok(source)
}

/// Whether the whole pattern is anchored on the side the text gets inserted.
fn anchor(pattern_source: &str, flags: PatternFlags, mode: Mode) -> Anchor {
    let present = match mode {
        Mode::Append => ends_with_unescaped_dollar(pattern_source),
        Mode::Prepend => pattern_source.starts_with('^'),
        Mode::Replace => false,
    };
    if present && !has_top_level_alternation(pattern_source, flags) {
        Anchor::Present
    } else {
        Anchor::Absent
    }
}

fn ends_with_unescaped_dollar(source: &str) -> bool {
    match source.strip_suffix('$') {
        // An odd run of backslashes escapes the dollar
        Some(rest) => rest.chars().rev().take_while(|c| *c == '\\').count() % 2 == 0,
        None => false,
    }
}

/// Whether `source` has a `|` outside every group and character class.
fn has_top_level_alternation(source: &str, flags: PatternFlags) -> bool {
    let mut chars = source.chars().peekable();
    let mut groups = 0usize;
    let mut classes = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' => {
                classes += 1;
                // A `]` right after the opening bracket (or `[^`) is literal
                if chars.peek() == Some(&'^') {
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    chars.next();
                }
            }
            ']' if classes > 0 => classes -= 1,
            _ if classes > 0 => {}
            '#' if flags.ignore_whitespace => {
                for skipped in chars.by_ref() {
                    if skipped == '\n' {
                        break;
                    }
                }
            }
            '(' => groups += 1,
            ')' => groups = groups.saturating_sub(1),
            '|' if groups == 0 => return true,
            _ => {}
        }
    }

    false
}
