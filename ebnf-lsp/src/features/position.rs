use lsp_types::{Position, Range};
use std::ops::Range as ByteRange;

/// Converts between byte offsets and LSP positions, whose columns count UTF-16 code units.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (idx, ch) in text.char_indices() {
            if ch == '\n' {
                line_starts.push(idx + ch.len_utf8());
            }
        }
        Self { text, line_starts }
    }

    /// Offsets past the end or inside a character snap back to the previous boundary.
    pub fn position(&self, offset: usize) -> Position {
        let offset = self.floor_boundary(offset);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.line_starts[line];
        let character = self.text[start..offset].encode_utf16().count();
        Position::new(line as u32, character as u32)
    }

    pub fn range(&self, span: ByteRange<usize>) -> Range {
        Range::new(self.position(span.start), self.position(span.end))
    }

    /// Byte offset of `position`. Columns past the end of a line resolve to the line end.
    pub fn offset(&self, position: Position) -> usize {
        let Some(&start) = self.line_starts.get(position.line as usize) else {
            return self.text.len();
        };

        let mut units = 0;
        for (idx, ch) in self.text[start..].char_indices() {
            if ch == '\n' || units >= position.character as usize {
                return start + idx;
            }
            units += ch.len_utf16();
        }
        self.text.len()
    }

    fn floor_boundary(&self, offset: usize) -> usize {
        let mut offset = offset.min(self.text.len());
        while !self.text.is_char_boundary(offset) {
            offset -= 1;
        }
        offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_count_utf16_units() {
        let text = "a = 'é𝄞' ;\nb = c ;";
        let index = LineIndex::new(text);
        let semicolon = text.find(';').unwrap();
        // é is one unit, the clef two
        assert_eq!(index.position(semicolon), Position::new(0, 10));
        assert_eq!(index.position(text.rfind('c').unwrap()), Position::new(1, 4));
    }

    #[test]
    fn offsets_round_trip_on_boundaries() {
        let text = "x = 'ü' ;\n\ny = x ;";
        let index = LineIndex::new(text);
        for (offset, _) in text.char_indices() {
            assert_eq!(index.offset(index.position(offset)), offset);
        }
    }

    #[test]
    fn out_of_range_input_is_clamped() {
        let text = "ab\ncd";
        let index = LineIndex::new(text);
        assert_eq!(index.position(99), Position::new(1, 2));
        assert_eq!(index.offset(Position::new(0, 40)), 2);
        assert_eq!(index.offset(Position::new(7, 0)), text.len());
    }
}
