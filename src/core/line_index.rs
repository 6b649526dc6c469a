//! Position Index
//!
//! Translates byte offsets produced by the validator into LSP positions
//! (zero-based line, UTF-16 column) and back.

use tower_lsp::lsp_types::Position;

/// Offset-to-position translation service
pub trait PositionEncoder {
    fn position_at(&self, offset: usize) -> Position;
    fn offset_at(&self, position: Position) -> usize;
}

/// Line start table for a single snapshot of a document
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];

        for (idx, &byte) in bytes.iter().enumerate() {
            match byte {
                b'\n' => line_starts.push(idx + 1),
                // Lone carriage return; CRLF is handled by the '\n' arm
                b'\r' if bytes.get(idx + 1) != Some(&b'\n') => line_starts.push(idx + 1),
                _ => {}
            }
        }

        Self { text, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte range of a line's content, without its terminator
    fn line_bounds(&self, line: usize) -> (usize, usize) {
        let start = self.line_starts[line];
        let mut end = self
            .line_starts
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let content = &self.text.as_bytes()[start..end];
        if content.ends_with(b"\r\n") {
            end -= 2;
        } else if content.ends_with(b"\n") || content.ends_with(b"\r") {
            end -= 1;
        }
        (start, end)
    }

    fn floor_char_boundary(&self, mut offset: usize) -> usize {
        offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

impl PositionEncoder for LineIndex<'_> {
    fn position_at(&self, offset: usize) -> Position {
        let offset = self.floor_char_boundary(offset);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let start = self.line_starts[line];
        let character: usize = self.text[start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();

        Position::new(line as u32, character as u32)
    }

    fn offset_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_starts.len() {
            return self.text.len();
        }

        let (start, end) = self.line_bounds(line);
        let mut remaining = position.character as usize;
        for (idx, ch) in self.text[start..end].char_indices() {
            let width = ch.len_utf16();
            if remaining < width {
                return start + idx;
            }
            remaining -= width;
        }
        end
    }
}
