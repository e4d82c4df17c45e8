//! Forward patching and the substitution loop shared with revert.

use crate::patch::cursor::{Cursor, Match};
use crate::patch::errors::PatchError;
use crate::patch::mode::Mode;
use crate::patch::pattern::Pattern;
use log::debug;
use regex::Regex;

/// Insert or substitute `text` at the first match of `pattern` at or after
/// `offset`, or at every match when `global` is set.
///
/// Returns the buffer unchanged when nothing matches. Searching resumes after
/// each replacement, so text inserted by this call is never matched again.
///
/// # Example
///
/// ```
/// use pattern_patch::{apply, Mode, Pattern};
///
/// let pattern = Pattern::new("a").unwrap();
/// let patched = apply("aaa", &pattern, "b", true, Mode::Append, 0).unwrap();
/// assert_eq!(patched, "ababab");
/// ```
pub fn apply(
    buffer: &str,
    pattern: &Pattern,
    text: &str,
    global: bool,
    mode: Mode,
    offset: usize,
) -> Result<String, PatchError> {
    substitute(buffer, pattern.regex(), global, offset, |found| match mode {
        Mode::Append => format!("{}{}", found.matched_text(), text),
        Mode::Prepend => format!("{}{}", text, found.matched_text()),
        Mode::Replace => text.to_string(),
    })
}

/// Replace matches of `pattern` with whatever `replacement` returns for them.
///
/// After each step the buffer is `pre_text + replacement + post_text` and the
/// search resumes at `len(pre_text) + len(replacement)`. An empty match also
/// steps over the following character so a global pass always terminates.
pub(crate) fn substitute<F>(
    buffer: &str,
    pattern: &Regex,
    global: bool,
    offset: usize,
    mut replacement: F,
) -> Result<String, PatchError>
where
    F: FnMut(&Match<'_>) -> String,
{
    check_offset(buffer, offset)?;

    let mut contents = buffer.to_string();
    let mut cursor = Cursor::new(pattern, offset);

    while let Some(found) = cursor.next_match(&contents) {
        let patched = replacement(&found);
        let resume = found.start + patched.len();
        let following = found.post_text().chars().next();

        debug!(
            "pattern /{}/ matched [{}, {}), {} -> {} bytes",
            pattern.as_str(),
            found.start,
            found.end,
            found.end - found.start,
            patched.len()
        );

        let mut rebuilt = String::with_capacity(
            found.pre_text().len() + patched.len() + found.post_text().len(),
        );
        rebuilt.push_str(found.pre_text());
        rebuilt.push_str(&patched);
        rebuilt.push_str(found.post_text());
        let stalled = found.is_empty();
        contents = rebuilt;

        match (stalled, following) {
            (false, _) => cursor.advance_to(resume),
            (true, Some(c)) => cursor.advance_to(resume + c.len_utf8()),
            (true, None) => break,
        }

        if !global {
            break;
        }
    }

    Ok(contents)
}

fn check_offset(buffer: &str, offset: usize) -> Result<(), PatchError> {
    if offset > buffer.len() || !buffer.is_char_boundary(offset) {
        return Err(PatchError::InvalidOffset {
            offset,
            len: buffer.len(),
        });
    }
    Ok(())
}
