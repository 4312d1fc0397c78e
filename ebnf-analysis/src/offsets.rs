//! Token offset recovery
//!
//! The lexer hands out bare strings, so positions are recovered by scanning the source: each
//! token is searched for at or after the end of the previous one. A token that cannot be found
//! ahead of the cursor is searched for anywhere in the text, and failing that it is placed at the
//! cursor. The map is therefore always complete, but offsets for pathological inputs can be wrong.

use std::ops::Range;

/// Byte ranges of a token sequence within its source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenOffsetMap {
    starts: Vec<usize>,
    lengths: Vec<usize>,
}

impl TokenOffsetMap {
    pub fn build<S: AsRef<str>>(text: &str, tokens: &[S]) -> Self {
        let mut starts = Vec::with_capacity(tokens.len());
        let mut lengths = Vec::with_capacity(tokens.len());
        let mut cursor = 0;

        for (index, token) in tokens.iter().enumerate() {
            let token = token.as_ref();
            let start = if token.is_empty() {
                cursor
            } else if let Some(found) = text[cursor..].find(token) {
                cursor + found
            } else if let Some(found) = text.find(token) {
                log::trace!("token {index} '{token}' found behind the cursor at {found}");
                found
            } else {
                log::trace!("token {index} '{token}' not in source, placed at {cursor}");
                cursor
            };

            let mut end = (start + token.len()).min(text.len());
            while !text.is_char_boundary(end) {
                end -= 1;
            }

            starts.push(start);
            lengths.push(end - start);
            cursor = cursor.max(end);
        }

        Self { starts, lengths }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn start(&self, index: usize) -> Option<usize> {
        self.starts.get(index).copied()
    }

    pub fn length(&self, index: usize) -> Option<usize> {
        self.lengths.get(index).copied()
    }

    /// Byte range of token `index`.
    pub fn span(&self, index: usize) -> Option<Range<usize>> {
        let start = self.start(index)?;
        Some(start..start + self.lengths[index])
    }

    /// Byte range from the start of token `from` to the end of token `to - 1`.
    ///
    /// The token range is clamped to the map; an empty clamped range yields `None`.
    pub fn covering(&self, from: usize, to: usize) -> Option<Range<usize>> {
        let to = to.min(self.len());
        if from >= to {
            return None;
        }
        let first = self.span(from)?;
        let last = self.span(to - 1)?;
        Some(first.start..last.end.max(first.start))
    }

    pub fn spans(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.len()).filter_map(|index| self.span(index))
    }
}
