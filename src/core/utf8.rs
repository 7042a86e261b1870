use unicode_segmentation::UnicodeSegmentation;

/// Helper to get the byte index of the nth grapheme cluster (grapheme → byte)
pub fn grapheme_byte_index(text: &str, n: usize) -> Option<usize> {
    text.grapheme_indices(true).nth(n).map(|(idx, _)| idx)
}

/// Helper to get the grapheme column at or before a byte offset (byte → grapheme)
/// This is the inverse of grapheme_byte_index
pub fn byte_to_grapheme_col(text: &str, byte_offset: usize) -> usize {
    let mut col = 0;
    for (idx, _) in text.grapheme_indices(true) {
        if idx >= byte_offset {
            break;
        }
        col += 1;
    }
    col
}

/// Word characters for in-buffer completion: alphanumeric or underscore
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
