//! Buffer: Pure data structure holding one document's text
//! No cursor, path or search state (those belong to DocumentSession)
//!
//! Content is stored in a ropey Rope. All public offsets are byte offsets;
//! every offset handed in is clamped to `0..=len` and snapped back to a char
//! boundary, so callers can never address the middle of a code point.
//! Line and column are always derived from the rope, never stored.

use ropey::Rope;
use std::fmt;
use std::ops::Range;

use crate::core::utf8;

#[derive(Debug, Clone)]
pub struct Buffer {
    /// Text content stored in a Rope (O(log n) operations)
    rope: Rope,
    /// Version counter, bumped on every mutation
    version: u64,
}

impl Buffer {
    /// Create a new empty buffer
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            version: 0,
        }
    }

    /// Create a buffer from a string
    pub fn from_string(content: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(content.as_ref()),
            version: 0,
        }
    }

    // ==================== Content Access ====================

    /// Get total length in bytes
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Monotonic mutation counter
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Clamp an offset into the buffer and snap it to a char boundary
    pub fn clamp(&self, pos: usize) -> usize {
        let pos = pos.min(self.rope.len_bytes());
        let char_idx = self.rope.byte_to_char(pos);
        self.rope.char_to_byte(char_idx)
    }

    /// Get a range of text as string
    pub fn slice(&self, range: Range<usize>) -> String {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        if start >= end {
            return String::new();
        }
        self.rope.byte_slice(start..end).to_string()
    }

    // ==================== Line Operations (O(log n) via Rope) ====================

    /// Get number of lines in buffer
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get byte offset for start of a line
    pub fn line_to_byte(&self, line_idx: usize) -> Option<usize> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        Some(self.rope.line_to_byte(line_idx))
    }

    /// Get which line a byte offset is on
    pub fn byte_to_line(&self, byte_offset: usize) -> usize {
        let byte_offset = self.clamp(byte_offset);
        self.rope.byte_to_line(byte_offset)
    }

    /// Get content of a specific line (without newline)
    pub fn line(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let s = self.rope.line(line_idx).to_string();
        Some(s.trim_end_matches(['\n', '\r']).to_string())
    }

    /// (line, column) of an offset; the column counts grapheme clusters
    pub fn line_col(&self, byte_offset: usize) -> (usize, usize) {
        let pos = self.clamp(byte_offset);
        let line_idx = self.rope.byte_to_line(pos);
        let line_start = self.rope.line_to_byte(line_idx);
        let line_text = self.rope.line(line_idx).to_string();
        (
            line_idx,
            utf8::byte_to_grapheme_col(&line_text, pos - line_start),
        )
    }

    /// Offset of (line, column); both are clamped to the buffer
    pub fn offset_at(&self, line_idx: usize, col: usize) -> usize {
        let last_line = self.rope.len_lines().saturating_sub(1);
        let line_idx = line_idx.min(last_line);
        let line_start = self.rope.line_to_byte(line_idx);
        let Some(line_text) = self.line(line_idx) else {
            return line_start;
        };
        match utf8::grapheme_byte_index(&line_text, col) {
            Some(idx) => line_start + idx,
            None => line_start + line_text.len(),
        }
    }

    // ==================== Editing Operations ====================

    /// Insert text at byte position
    pub fn insert(&mut self, pos: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        let pos = self.clamp(pos);
        let char_idx = self.rope.byte_to_char(pos);
        self.rope.insert(char_idx, text);
        self.version += 1;
    }

    /// Delete a byte range
    pub fn delete(&mut self, range: Range<usize>) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end);
        if start >= end {
            return;
        }
        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        self.version += 1;
    }

    /// Replace a byte range with text as a single mutation
    pub fn replace(&mut self, range: Range<usize>, text: &str) {
        let start = self.clamp(range.start);
        let end = self.clamp(range.end).max(start);
        let start_char = self.rope.byte_to_char(start);
        let end_char = self.rope.byte_to_char(end);
        self.rope.remove(start_char..end_char);
        self.rope.insert(start_char, text);
        self.version += 1;
    }

    /// Replace the whole content
    pub fn set_content(&mut self, content: &str) {
        self.rope = Rope::from_str(content);
        self.version += 1;
    }

    /// Remove all content
    pub fn clear(&mut self) {
        self.set_content("");
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
