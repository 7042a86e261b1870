//! Find / replace engine
//!
//! One matching contract serves both the plain find flow and the
//! find-and-replace flow: the pattern is matched literally (escaped for the
//! regex engine), leftmost-first and non-overlapping, with a single explicit
//! case-sensitivity flag.
//!
//! [`SearchState`] is a small state machine over Idle / Searching / Replacing.
//! The match list is tagged with the buffer version it was computed for; an
//! edit made anywhere else invalidates it, and the next navigation drops back
//! to Idle and rescans before moving.

use regex::{Regex, RegexBuilder};
use std::ops::Range;

use super::buffer::Buffer;

/// Build the literal matcher for `pattern`
fn matcher(pattern: &str, case_sensitive: bool) -> Option<Regex> {
    if pattern.is_empty() {
        return None;
    }
    match RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(!case_sensitive)
        .build()
    {
        Ok(re) => Some(re),
        Err(err) => {
            tracing::warn!("cannot search for {pattern:?}: {err}");
            None
        }
    }
}

/// All match spans of `pattern` in `text`, in order
pub fn find_matches(text: &str, pattern: &str, case_sensitive: bool) -> Vec<Range<usize>> {
    match matcher(pattern, case_sensitive) {
        Some(re) => re.find_iter(text).map(|m| m.range()).collect(),
        None => Vec::new(),
    }
}

/// Replace every match in a single pass; the buffer is only touched when at
/// least one match exists. Replacement text is inserted literally.
pub fn replace_all(buffer: &mut Buffer, pattern: &str, replacement: &str, case_sensitive: bool) -> usize {
    let Some(re) = matcher(pattern, case_sensitive) else {
        return 0;
    };
    let text = buffer.to_string();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut count = 0;
    for m in re.find_iter(&text) {
        out.push_str(&text[last..m.start()]);
        out.push_str(replacement);
        last = m.end();
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    out.push_str(&text[last..]);
    buffer.set_content(&out);
    count
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Idle,
    Searching,
    Replacing {
        replacement: String,
    },
}

/// Result of a navigation step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    /// Next match at or after the search cursor
    Found(Range<usize>),
    /// Reached the end; wrapped to the first match
    Wrapped(Range<usize>),
    /// The active pattern does not occur
    NoMatches,
    /// No search is active
    Inactive,
}

impl FindOutcome {
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            FindOutcome::Found(r) | FindOutcome::Wrapped(r) => Some(r.clone()),
            _ => None,
        }
    }
}

/// Result of replacing the current match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// Replaced; `next` is the following match, or `None` when none remain
    Replaced {
        range: Range<usize>,
        next: Option<FindOutcome>,
    },
    /// Replacing, but no match is currently selected
    NoCurrentMatch,
    /// Not in the replacing state
    Inactive,
}

/// Per-document search state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub pattern: String,
    pub case_sensitive: bool,
    matches: Vec<Range<usize>>,
    current: Option<usize>,
    cursor: usize,
    mode: SearchMode,
    version: u64,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &SearchMode {
        &self.mode
    }

    pub fn is_active(&self) -> bool {
        self.mode != SearchMode::Idle
    }

    pub fn replacement(&self) -> Option<&str> {
        match &self.mode {
            SearchMode::Replacing { replacement } => Some(replacement),
            _ => None,
        }
    }

    /// Match spans to highlight (empty when idle)
    pub fn highlights(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn current_match(&self) -> Option<Range<usize>> {
        self.current.and_then(|i| self.matches.get(i)).cloned()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// True when the buffer changed since the match list was built
    pub fn is_stale(&self, buffer: &Buffer) -> bool {
        self.is_active() && self.version != buffer.version()
    }

    /// Idle → Searching; returns the number of matches
    pub fn start_find(&mut self, buffer: &Buffer, pattern: &str, case_sensitive: bool) -> usize {
        self.begin(buffer, pattern, case_sensitive, SearchMode::Searching)
    }

    /// Idle → Replacing; returns the number of matches
    pub fn start_replace(
        &mut self,
        buffer: &Buffer,
        pattern: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> usize {
        let mode = SearchMode::Replacing {
            replacement: replacement.to_string(),
        };
        self.begin(buffer, pattern, case_sensitive, mode)
    }

    fn begin(&mut self, buffer: &Buffer, pattern: &str, case_sensitive: bool, mode: SearchMode) -> usize {
        self.pattern = pattern.to_string();
        self.case_sensitive = case_sensitive;
        self.mode = mode;
        self.cursor = 0;
        self.rescan(buffer);
        tracing::debug!(pattern, case_sensitive, count = self.matches.len(), "search started");
        self.matches.len()
    }

    fn rescan(&mut self, buffer: &Buffer) {
        self.matches = find_matches(&buffer.to_string(), &self.pattern, self.case_sensitive);
        self.current = None;
        self.cursor = buffer.clamp(self.cursor);
        self.version = buffer.version();
    }

    /// Rescan a stale match list in place, keeping the mode and pattern
    fn revalidate(&mut self, buffer: &Buffer) {
        if self.is_stale(buffer) {
            tracing::debug!(pattern = %self.pattern, "buffer changed, rescanning matches");
            self.rescan(buffer);
        }
    }

    /// Toggle case sensitivity and rescan from the top
    pub fn set_case_sensitive(&mut self, buffer: &Buffer, case_sensitive: bool) -> usize {
        self.case_sensitive = case_sensitive;
        if self.is_active() {
            self.cursor = 0;
            self.rescan(buffer);
        }
        self.matches.len()
    }

    /// Next match at or after the search cursor, wrapping at the end
    pub fn find_next(&mut self, buffer: &Buffer) -> FindOutcome {
        if !self.is_active() {
            return FindOutcome::Inactive;
        }
        self.revalidate(buffer);
        if self.matches.is_empty() {
            self.current = None;
            return FindOutcome::NoMatches;
        }

        let idx = self.matches.partition_point(|m| m.start < self.cursor);
        let (idx, wrapped) = if idx < self.matches.len() {
            (idx, false)
        } else {
            (0, true)
        };
        let span = self.matches[idx].clone();
        self.current = Some(idx);
        self.cursor = span.end;
        if wrapped {
            FindOutcome::Wrapped(span)
        } else {
            FindOutcome::Found(span)
        }
    }

    /// Replace the current match and advance to the next one
    pub fn replace_one(&mut self, buffer: &mut Buffer) -> ReplaceOutcome {
        let Some(replacement) = self.replacement().map(str::to_string) else {
            return ReplaceOutcome::Inactive;
        };
        self.revalidate(buffer);
        let Some(idx) = self.current else {
            return ReplaceOutcome::NoCurrentMatch;
        };

        let span = self.matches.remove(idx);
        buffer.replace(span.clone(), &replacement);
        let new_end = span.start + replacement.len();

        // Only the tail after the replaced span moves
        for m in &mut self.matches[idx..] {
            m.start = m.start - span.len() + replacement.len();
            m.end = m.end - span.len() + replacement.len();
        }
        self.version = buffer.version();
        self.current = None;
        self.cursor = new_end;

        let range = span.start..new_end;
        if self.matches.is_empty() {
            self.clear();
            return ReplaceOutcome::Replaced { range, next: None };
        }
        let next = self.find_next(buffer);
        ReplaceOutcome::Replaced {
            range,
            next: Some(next),
        }
    }

    /// Replace every occurrence and return to Idle
    pub fn replace_all(
        &mut self,
        buffer: &mut Buffer,
        pattern: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> usize {
        let count = replace_all(buffer, pattern, replacement, case_sensitive);
        self.clear();
        count
    }

    /// Back to Idle, dropping highlights
    pub fn clear(&mut self) {
        self.matches.clear();
        self.current = None;
        self.cursor = 0;
        self.mode = SearchMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matches_literal_and_non_overlapping() {
        assert_eq!(find_matches("aaaa", "aa", true), vec![0..2, 2..4]);
        assert_eq!(find_matches("a.b a+b", "a+b", true), vec![4..7]);
        assert!(find_matches("abc", "", true).is_empty());
    }

    #[test]
    fn test_case_folding() {
        assert_eq!(find_matches("Foo foo FOO", "foo", true), vec![4..7]);
        assert_eq!(find_matches("Foo foo FOO", "foo", false), vec![0..3, 4..7, 8..11]);
    }

    #[test]
    fn test_absent_pattern() {
        let buf = Buffer::from_string("nothing here");
        let mut state = SearchState::new();
        assert_eq!(state.start_find(&buf, "zzz", true), 0);
        for _ in 0..3 {
            assert_eq!(state.find_next(&buf), FindOutcome::NoMatches);
        }
    }

    #[test]
    fn test_find_next_cycles_through_all_matches() {
        let buf = Buffer::from_string("foo bar foo baz foo");
        let mut state = SearchState::new();
        assert_eq!(state.start_find(&buf, "foo", true), 3);

        assert_eq!(state.find_next(&buf), FindOutcome::Found(0..3));
        assert_eq!(state.find_next(&buf), FindOutcome::Found(8..11));
        assert_eq!(state.find_next(&buf), FindOutcome::Found(16..19));
        assert_eq!(state.find_next(&buf), FindOutcome::Wrapped(0..3));
        assert_eq!(state.current_match(), Some(0..3));
    }

    #[test]
    fn test_idle_find_next_is_inactive() {
        let buf = Buffer::from_string("foo");
        let mut state = SearchState::new();
        assert_eq!(state.find_next(&buf), FindOutcome::Inactive);
    }

    #[test]
    fn test_external_edit_invalidates_matches() {
        let mut buf = Buffer::from_string("foo foo");
        let mut state = SearchState::new();
        state.start_find(&buf, "foo", true);
        assert_eq!(state.find_next(&buf), FindOutcome::Found(0..3));

        buf.insert(0, "foo ");
        assert!(state.is_stale(&buf));
        // Rescanned: three matches now, cursor kept at 3
        assert_eq!(state.find_next(&buf), FindOutcome::Found(4..7));
        assert_eq!(state.match_count(), 3);
        assert!(!state.is_stale(&buf));
    }

    #[test]
    fn test_stale_rescan_keeps_replacing_mode() {
        let mut buf = Buffer::from_string("x y");
        let mut state = SearchState::new();
        state.start_replace(&buf, "x", "z", true);
        buf.insert(3, " x");

        assert_eq!(state.find_next(&buf), FindOutcome::Found(0..1));
        assert_eq!(state.match_count(), 2);
        assert_eq!(state.replacement(), Some("z"));
        assert!(matches!(
            state.replace_one(&mut buf),
            ReplaceOutcome::Replaced { range: _, next: Some(_) }
        ));
    }

    #[test]
    fn test_replace_one_shifts_tail_and_advances() {
        let mut buf = Buffer::from_string("cat dog cat dog cat");
        let mut state = SearchState::new();
        state.start_replace(&buf, "cat", "tiger", true);
        assert_eq!(state.find_next(&buf), FindOutcome::Found(0..3));

        let outcome = state.replace_one(&mut buf);
        assert_eq!(
            outcome,
            ReplaceOutcome::Replaced {
                range: 0..5,
                next: Some(FindOutcome::Found(10..13)),
            }
        );
        assert_eq!(buf.to_string(), "tiger dog cat dog cat");
        assert_eq!(state.highlights(), &[10..13, 18..21]);
    }

    #[test]
    fn test_replace_one_until_exhausted_returns_to_idle() {
        let mut buf = Buffer::from_string("a-a");
        let mut state = SearchState::new();
        state.start_replace(&buf, "a", "bb", true);
        state.find_next(&buf);

        assert!(matches!(
            state.replace_one(&mut buf),
            ReplaceOutcome::Replaced { next: Some(_), .. }
        ));
        assert_eq!(
            state.replace_one(&mut buf),
            ReplaceOutcome::Replaced {
                range: 3..5,
                next: None
            }
        );
        assert_eq!(buf.to_string(), "bb-bb");
        assert_eq!(state.mode(), &SearchMode::Idle);
    }

    #[test]
    fn test_replace_one_requires_current_match() {
        let mut buf = Buffer::from_string("x");
        let mut state = SearchState::new();
        assert_eq!(state.replace_one(&mut buf), ReplaceOutcome::Inactive);

        state.start_replace(&buf, "x", "y", true);
        assert_eq!(state.replace_one(&mut buf), ReplaceOutcome::NoCurrentMatch);
        assert_eq!(buf.to_string(), "x");
    }

    #[test]
    fn test_replacement_is_literal() {
        let mut buf = Buffer::from_string("a b a");
        assert_eq!(replace_all(&mut buf, "a", "$0$1", true), 2);
        assert_eq!(buf.to_string(), "$0$1 b $0$1");
    }

    #[test]
    fn test_replace_all_count_and_idempotence() {
        let mut buf = Buffer::from_string("one two one two one");
        let mut state = SearchState::new();
        assert_eq!(state.replace_all(&mut buf, "one", "1", true), 3);
        assert_eq!(buf.to_string(), "1 two 1 two 1");
        assert_eq!(state.start_find(&buf, "one", true), 0);

        let version = buf.version();
        assert_eq!(state.replace_all(&mut buf, "one", "1", true), 0);
        assert_eq!(buf.version(), version);
    }

    #[test]
    fn test_replace_all_case_insensitive() {
        let mut buf = Buffer::from_string("Hello hello HELLO");
        assert_eq!(replace_all(&mut buf, "hello", "bye", false), 3);
        assert_eq!(buf.to_string(), "bye bye bye");
    }

    #[test]
    fn test_toggle_case_rescans() {
        let buf = Buffer::from_string("Foo foo");
        let mut state = SearchState::new();
        assert_eq!(state.start_find(&buf, "foo", true), 1);
        assert_eq!(state.set_case_sensitive(&buf, false), 2);
        assert_eq!(state.find_next(&buf), FindOutcome::Found(0..3));
    }
}
