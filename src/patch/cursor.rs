//! Movable search position over a buffer that changes between searches.

use regex::Regex;

/// A located occurrence of a pattern in a buffer.
///
/// `pre_text() + matched_text() + post_text()` is always the whole buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'b> {
    buffer: &'b str,
    /// Starting byte offset (inclusive)
    pub start: usize,
    /// Ending byte offset (exclusive)
    pub end: usize,
}

impl<'b> Match<'b> {
    /// The whole buffer the match was found in.
    pub fn haystack(&self) -> &'b str {
        self.buffer
    }

    pub fn matched_text(&self) -> &'b str {
        &self.buffer[self.start..self.end]
    }

    pub fn pre_text(&self) -> &'b str {
        &self.buffer[..self.start]
    }

    pub fn post_text(&self) -> &'b str {
        &self.buffer[self.end..]
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Finds successive matches of one pattern, starting each search where the
/// previous replacement ended.
///
/// The cursor holds a position rather than a borrow of the buffer, so the
/// caller is free to rebuild the buffer between calls to [`Cursor::next_match`].
#[derive(Debug, Clone)]
pub struct Cursor<'p> {
    pattern: &'p Regex,
    position: usize,
}

impl<'p> Cursor<'p> {
    pub fn new(pattern: &'p Regex, offset: usize) -> Self {
        Self {
            pattern,
            position: offset,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Leftmost-first match at or after the current position.
    ///
    /// Text before the position still counts as context for anchors and
    /// word boundaries, it just cannot be part of the match.
    pub fn next_match<'b>(&self, buffer: &'b str) -> Option<Match<'b>> {
        if self.position > buffer.len() {
            return None;
        }
        self.pattern
            .find_at(buffer, self.position)
            .map(|m| Match {
                buffer,
                start: m.start(),
                end: m.end(),
            })
    }

    pub fn advance_to(&mut self, position: usize) {
        self.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_parts_rebuild_buffer() {
        let re = Regex::new("b+").unwrap();
        let cursor = Cursor::new(&re, 0);
        let m = cursor.next_match("aabbbcc").unwrap();
        assert_eq!((m.start, m.end), (2, 5));
        assert_eq!(m.pre_text(), "aa");
        assert_eq!(m.matched_text(), "bbb");
        assert_eq!(m.post_text(), "cc");
        assert_eq!(
            format!("{}{}{}", m.pre_text(), m.matched_text(), m.post_text()),
            "aabbbcc"
        );
    }

    #[test]
    fn test_search_starts_at_position() {
        let re = Regex::new("a").unwrap();
        let mut cursor = Cursor::new(&re, 0);
        assert_eq!(cursor.next_match("a-a").unwrap().start, 0);

        cursor.advance_to(1);
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.next_match("a-a").unwrap().start, 2);

        cursor.advance_to(3);
        assert!(cursor.next_match("a-a").is_none());
    }

    #[test]
    fn test_position_past_end_finds_nothing() {
        let re = Regex::new("").unwrap();
        let cursor = Cursor::new(&re, 10);
        assert!(cursor.next_match("short").is_none());
    }

    #[test]
    fn test_anchor_sees_text_before_position() {
        let re = Regex::new(r"\bword").unwrap();
        let cursor = Cursor::new(&re, 1);
        // 'x' precedes the position, so there is no boundary before "word"
        assert!(cursor.next_match("xword").is_none());
        assert_eq!(cursor.next_match("x word").unwrap().start, 2);
    }
}
