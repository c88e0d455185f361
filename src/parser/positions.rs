//! Position conversion utilities.
//!
//! Tree-sitter reports byte offsets; the rewriter reasons in physical lines.
//! `LineIndex` converts between the two using the same line-break rules as
//! the tokenizer (`\n`, `\r\n` and a lone `\r` each end a line).

use super::tokenizer::Position;

/// Start offsets of every physical line in a source text
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self { line_starts }
    }

    /// Line (0-indexed) containing the byte offset
    pub fn line_of(&self, byte_offset: usize) -> usize {
        self.line_starts
            .partition_point(|&start| start <= byte_offset)
            .saturating_sub(1)
    }

    /// Full position of a byte offset; the column counts characters
    pub fn position(&self, source: &str, byte_offset: usize) -> Position {
        let byte = byte_offset.min(source.len());
        let line = self.line_of(byte);
        let line_start = self.line_starts[line];
        let col = source
            .get(line_start..byte)
            .map_or(0, |prefix| prefix.chars().count());
        Position { byte, line, col }
    }
}
