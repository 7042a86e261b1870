//! Prefix completion
//!
//! One matching algorithm ([`suggest`]) serves two independent modes:
//!
//! - **path mode** ([`path_candidates`]): entries of the directory implied by
//!   a possibly directory-qualified prefix, for the command bar;
//! - **word mode** ([`WordCompleter`]): distinct word tokens of the active
//!   buffer, for in-editor completion.
//!
//! Matching is case-insensitive, results are sorted and deduplicated, the
//! literal prefix itself is never offered, and at most `limit` candidates are
//! returned.

use std::collections::BTreeSet;
use std::path::Path;

use super::buffer::Buffer;
use super::fs::{FileSystem, resolve};
use super::id::SessionId;
use super::utf8::is_word_char;

/// Default bound on the number of suggestions shown
pub const MAX_SUGGESTIONS: usize = 10;

/// Candidates from `source` that start with `prefix` (case-insensitive)
pub fn suggest<I, S>(prefix: &str, source: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let folded = prefix.to_lowercase();
    let mut matches: Vec<String> = source
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .filter(|s| s != prefix && s.to_lowercase().starts_with(&folded))
        .collect();

    matches.sort_by(|a, b| {
        a.to_lowercase()
            .cmp(&b.to_lowercase())
            .then_with(|| a.cmp(b))
    });
    matches.dedup();
    matches.truncate(limit);
    matches
}

/// Longest prefix shared by all candidates (case-insensitive), spelled as in
/// the first candidate
pub fn common_prefix(candidates: &[String]) -> String {
    let Some(first) = candidates.first() else {
        return String::new();
    };
    let mut end = first.len();
    for other in &candidates[1..] {
        let shared: usize = first
            .chars()
            .zip(other.chars())
            .take_while(|(a, b)| a.to_lowercase().eq(b.to_lowercase()))
            .map(|(a, _)| a.len_utf8())
            .sum();
        end = end.min(shared);
    }
    first[..end].to_string()
}

/// The common prefix, if it is strictly longer than what was typed
pub fn autofill(prefix: &str, candidates: &[String]) -> Option<String> {
    let common = common_prefix(candidates);
    (common.chars().count() > prefix.chars().count()).then_some(common)
}

/// Suggestion list plus its cycle position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    pub prefix: String,
    pub candidates: Vec<String>,
    pub index: Option<usize>,
}

impl SuggestionState {
    pub fn new(prefix: impl Into<String>, candidates: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            candidates,
            index: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Advance to the next candidate, wrapping around
    pub fn cycle(&mut self) -> Option<&str> {
        if self.candidates.is_empty() {
            return None;
        }
        let next = match self.index {
            Some(i) => (i + 1) % self.candidates.len(),
            None => 0,
        };
        self.index = Some(next);
        self.candidates.get(next).map(String::as_str)
    }

    pub fn current(&self) -> Option<&str> {
        self.index
            .and_then(|i| self.candidates.get(i))
            .map(String::as_str)
    }
}

// =============================================================================
// PATH MODE
// =============================================================================

/// Split `dir/part/name` into (`dir/part/`, `name`)
pub fn split_path_prefix(prefix: &str) -> (&str, &str) {
    match prefix.rfind(['/', std::path::MAIN_SEPARATOR]) {
        Some(idx) => prefix.split_at(idx + 1),
        None => ("", prefix),
    }
}

/// Entries of the directory implied by `prefix`, keeping its directory part
///
/// An unreadable or missing directory yields no suggestions.
pub fn path_candidates(fs: &dyn FileSystem, cwd: &Path, prefix: &str, limit: usize) -> Vec<String> {
    let (dir_part, name_part) = split_path_prefix(prefix);
    let dir = if dir_part.is_empty() {
        cwd.to_path_buf()
    } else {
        resolve(cwd, dir_part)
    };
    let names = match fs.list_directory(&dir) {
        Ok(names) => names,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), "no path suggestions: {err}");
            return Vec::new();
        }
    };
    suggest(name_part, names, limit)
        .into_iter()
        .map(|name| format!("{dir_part}{name}"))
        .collect()
}

// =============================================================================
// WORD MODE
// =============================================================================

/// Outcome of one in-editor completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordCompletion {
    /// Cursor is not preceded by a word
    NoPrefix,
    /// No token in the buffer extends the prefix
    NoCandidates,
    /// Word was extended to the shared prefix of the candidates
    Extended { text: String, cursor: usize },
    /// Several candidates, nothing inserted until an explicit cycle step
    Listed(Vec<String>),
    /// Word replaced by the next candidate in the cycle
    Cycled { text: String, cursor: usize },
}

#[derive(Debug, Clone)]
struct WordCycle {
    session: SessionId,
    start: usize,
    end: usize,
    version: u64,
    state: SuggestionState,
}

/// Word completer for buffer-local completion
///
/// Collects word tokens from the buffer and provides completions based on a
/// prefix match. Repeating the request without any other input cycles
/// through the cached candidates instead of recomputing them.
#[derive(Debug, Default)]
pub struct WordCompleter {
    /// Cached words from the buffer
    cached_words: BTreeSet<String>,
    /// ID of the session the cache belongs to
    last_session: Option<SessionId>,
    /// Version of the buffer when words were collected
    last_version: u64,
    cycle: Option<WordCycle>,
}

impl WordCompleter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distinct maximal runs of word characters
    pub fn collect_words(content: &str) -> BTreeSet<String> {
        content
            .split(|c: char| !is_word_char(c))
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Word prefix ending at `cursor`: (start offset, text)
    pub fn prefix_at(buffer: &Buffer, cursor: usize) -> (usize, String) {
        let cursor = buffer.clamp(cursor);
        let line_start = buffer
            .line_to_byte(buffer.byte_to_line(cursor))
            .unwrap_or(0);
        let before = buffer.slice(line_start..cursor);
        let start = before
            .char_indices()
            .rev()
            .take_while(|(_, c)| is_word_char(*c))
            .last()
            .map(|(i, _)| i)
            .unwrap_or(before.len());
        (line_start + start, before[start..].to_string())
    }

    /// Current candidate list, if a completion is in progress
    pub fn candidates(&self) -> &[String] {
        self.cycle
            .as_ref()
            .map(|c| c.state.candidates.as_slice())
            .unwrap_or(&[])
    }

    /// Drop the cycle and cached candidates (any other key input)
    pub fn reset(&mut self) {
        self.cycle = None;
    }

    /// Complete the word before `cursor`, mutating the buffer as needed
    pub fn complete(
        &mut self,
        session: SessionId,
        buffer: &mut Buffer,
        cursor: usize,
        limit: usize,
    ) -> WordCompletion {
        let cursor = buffer.clamp(cursor);
        if let Some(outcome) = self.try_cycle(session, buffer, cursor) {
            return outcome;
        }
        self.cycle = None;

        let (start, prefix) = Self::prefix_at(buffer, cursor);
        if prefix.is_empty() {
            return WordCompletion::NoPrefix;
        }

        if self.last_session != Some(session) || self.last_version != buffer.version() {
            self.cached_words = Self::collect_words(&buffer.to_string());
            self.last_session = Some(session);
            self.last_version = buffer.version();
        }

        let candidates = suggest(&prefix, &self.cached_words, limit);
        if candidates.is_empty() {
            return WordCompletion::NoCandidates;
        }

        match autofill(&prefix, &candidates) {
            Some(text) => {
                buffer.replace(start..cursor, &text);
                let end = start + text.len();
                let remaining: Vec<String> =
                    candidates.into_iter().filter(|c| *c != text).collect();
                self.begin_cycle(session, buffer, start, end, &text, remaining);
                WordCompletion::Extended { text, cursor: end }
            }
            None => {
                self.begin_cycle(session, buffer, start, cursor, &prefix, candidates.clone());
                WordCompletion::Listed(candidates)
            }
        }
    }

    fn begin_cycle(
        &mut self,
        session: SessionId,
        buffer: &Buffer,
        start: usize,
        end: usize,
        prefix: &str,
        candidates: Vec<String>,
    ) {
        if candidates.is_empty() {
            return;
        }
        self.cycle = Some(WordCycle {
            session,
            start,
            end,
            version: buffer.version(),
            state: SuggestionState::new(prefix, candidates),
        });
    }

    fn try_cycle(&mut self, session: SessionId, buffer: &mut Buffer, cursor: usize) -> Option<WordCompletion> {
        let cycle = self.cycle.as_mut()?;
        // Any edit or cursor move since our last step invalidates the cycle
        if cycle.session != session || cycle.version != buffer.version() || cycle.end != cursor {
            return None;
        }
        let text = cycle.state.cycle()?.to_string();
        buffer.replace(cycle.start..cycle.end, &text);
        cycle.end = cycle.start + text.len();
        cycle.version = buffer.version();
        Some(WordCompletion::Cycled {
            text,
            cursor: cycle.end,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
