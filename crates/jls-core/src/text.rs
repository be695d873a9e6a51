//! Text positions, LSP-style ranges, and a byte-offset <-> UTF-16 index.

pub use text_size::{TextRange, TextSize};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// LSP-compatible position (UTF-16 code units).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    #[inline]
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// LSP-compatible range (UTF-16 code units), half-open.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    #[inline]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    #[inline]
    pub const fn point(pos: Position) -> Self {
        Self { start: pos, end: pos }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Precomputed line boundaries for one text snapshot, used to convert between
/// byte offsets (what the parser/HIR work in) and UTF-16 LSP positions (what
/// the wire protocol uses).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    line_ends: Vec<TextSize>,
    text_len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![TextSize::from(0)];
        let mut line_ends = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                b'\r' if i + 1 < bytes.len() && bytes[i + 1] == b'\n' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 2) as u32));
                    i += 2;
                }
                b'\r' => {
                    line_ends.push(TextSize::from(i as u32));
                    line_starts.push(TextSize::from((i + 1) as u32));
                    i += 1;
                }
                _ => i += 1,
            }
        }
        line_ends.push(TextSize::from(text.len() as u32));

        Self {
            line_starts,
            line_ends,
            text_len: TextSize::from(text.len() as u32),
        }
    }

    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.text_len
    }

    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    #[inline]
    pub fn line_start(&self, line: u32) -> Option<TextSize> {
        self.line_starts.get(line as usize).copied()
    }

    #[inline]
    pub fn line_end(&self, line: u32) -> Option<TextSize> {
        self.line_ends.get(line as usize).copied()
    }

    fn line_of_offset(&self, offset: TextSize) -> usize {
        let offset = offset.min(self.text_len);
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(insert) => insert.saturating_sub(1),
        }
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.text_len);
        let line = self.line_of_offset(offset);
        let line_start = self.line_starts[line];
        LineCol {
            line: line as u32,
            col: u32::from(offset.min(self.line_ends[line]) - line_start),
        }
    }

    /// Byte offset -> UTF-16 LSP position. `text` must be the exact snapshot
    /// this index was built from.
    pub fn position(&self, text: &str, offset: TextSize) -> Position {
        let offset = offset.min(self.text_len);
        let line = self.line_of_offset(offset);
        let line_start = usize::from(self.line_starts[line]);
        let clamped = usize::from(offset.min(self.line_ends[line]));
        let utf16_col: u32 = text[line_start..clamped].chars().map(|c| c.len_utf16() as u32).sum();
        Position { line: line as u32, character: utf16_col }
    }

    /// UTF-16 LSP position -> byte offset. Returns `None` for an out-of-range
    /// line, a `character` past end-of-line, or one that lands inside a
    /// surrogate pair.
    pub fn offset_of_position(&self, text: &str, position: Position) -> Option<TextSize> {
        let line_start = self.line_start(position.line)?;
        let line_end = self.line_end(position.line)?;
        if position.character == 0 {
            return Some(line_start);
        }

        let line_text = &text[usize::from(line_start)..usize::from(line_end)];
        let mut utf16 = 0u32;
        for (byte_idx, ch) in line_text.char_indices() {
            if utf16 == position.character {
                return Some(line_start + TextSize::from(byte_idx as u32));
            }
            let width = ch.len_utf16() as u32;
            if utf16 + width > position.character {
                return None;
            }
            utf16 += width;
        }
        (utf16 == position.character).then_some(line_end)
    }

    pub fn range(&self, text: &str, range: TextRange) -> Range {
        Range {
            start: self.position(text, range.start()),
            end: self.position(text, range.end()),
        }
    }

    pub fn text_range(&self, text: &str, range: Range) -> Option<TextRange> {
        let start = self.offset_of_position(text, range.start)?;
        let end = self.offset_of_position(text, range.end)?;
        Some(TextRange::new(start, end))
    }

    /// Widen a zero-width range to cover its whole enclosing line (spec.md
    /// §4.5 diagnostics: "zero-width diagnostics are widened to the
    /// enclosing source line").
    pub fn widen_to_line(&self, range: TextRange) -> TextRange {
        if !range.is_empty() {
            return range;
        }
        let line = self.line_of_offset(range.start());
        TextRange::new(self.line_starts[line], self.line_ends[line])
    }
}

#[cfg(feature = "lsp")]
mod lsp_compat {
    use super::{Position, Range};

    impl From<Position> for lsp_types::Position {
        fn from(value: Position) -> Self {
            lsp_types::Position { line: value.line, character: value.character }
        }
    }

    impl From<lsp_types::Position> for Position {
        fn from(value: lsp_types::Position) -> Self {
            Position { line: value.line, character: value.character }
        }
    }

    impl From<Range> for lsp_types::Range {
        fn from(value: Range) -> Self {
            lsp_types::Range { start: value.start.into(), end: value.end.into() }
        }
    }

    impl From<lsp_types::Range> for Range {
        fn from(value: lsp_types::Range) -> Self {
            Range { start: value.start.into(), end: value.end.into() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_pair_conversions() {
        let text = "a\u{1F600}b\nx";
        let index = LineIndex::new(text);
        assert_eq!(index.position(text, TextSize::from(0)), Position::new(0, 0));
        assert_eq!(index.position(text, TextSize::from(5)), Position::new(0, 3));
        assert_eq!(index.position(text, TextSize::from(7)), Position::new(1, 0));
        assert_eq!(
            index.offset_of_position(text, Position::new(0, 3)),
            Some(TextSize::from(5))
        );
        // Landing inside the surrogate pair is rejected.
        assert_eq!(index.offset_of_position(text, Position::new(0, 2)), None);
    }

    #[test]
    fn widen_to_line_expands_empty_range() {
        let text = "import java.util.List;\nclass A {}\n";
        let index = LineIndex::new(text);
        let empty = TextRange::new(TextSize::from(5), TextSize::from(5));
        let widened = index.widen_to_line(empty);
        assert_eq!(&text[widened], "import java.util.List;");
    }
}
