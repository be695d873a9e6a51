//! Byte-range text edits and workspace-wide edit batches.

use crate::{FileId, TextRange, TextSize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TextEdit {
    pub range: TextRange,
    pub replacement: String,
}

impl TextEdit {
    pub fn new(range: TextRange, replacement: impl Into<String>) -> Self {
        Self { range, replacement: replacement.into() }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::new(offset, offset), text)
    }

    pub fn delete(range: TextRange) -> Self {
        Self::new(range, "")
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WorkspaceEdit {
    pub changes: BTreeMap<FileId, Vec<TextEdit>>,
}

impl WorkspaceEdit {
    pub fn is_empty(&self) -> bool {
        self.changes.values().all(|edits| edits.is_empty())
    }

    pub fn add_edit(&mut self, file: FileId, edit: TextEdit) {
        self.changes.entry(file).or_default().push(edit);
    }

    pub fn merge(&mut self, other: WorkspaceEdit) {
        for (file, edits) in other.changes {
            self.changes.entry(file).or_default().extend(edits);
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum EditError {
    RangeOutOfBounds { range: TextRange, text_len: TextSize },
    OverlappingEdits { first: TextRange, second: TextRange },
}

impl std::fmt::Display for EditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditError::RangeOutOfBounds { range, text_len } => {
                write!(f, "edit range {range:?} is out of bounds for text length {text_len:?}")
            }
            EditError::OverlappingEdits { first, second } => {
                write!(f, "overlapping edits {first:?} and {second:?}")
            }
        }
    }
}

impl std::error::Error for EditError {}

/// Apply a batch of non-overlapping edits to `text` in one pass, ordering
/// them by start offset so callers don't need to pre-sort or re-offset after
/// each application (the common bug with naively applying edits in
/// caller-provided order).
pub fn apply_edits(text: &str, mut edits: Vec<TextEdit>) -> Result<String, EditError> {
    edits.sort_by_key(|e| e.range.start());

    let text_len = TextSize::from(text.len() as u32);
    let mut out = String::with_capacity(text.len());
    let mut cursor = TextSize::from(0);
    let mut prev_end: Option<TextSize> = None;

    for edit in edits {
        if edit.range.end() > text_len || edit.range.start() > edit.range.end() {
            return Err(EditError::RangeOutOfBounds { range: edit.range, text_len });
        }
        if let Some(prev_end) = prev_end {
            if edit.range.start() < prev_end {
                return Err(EditError::OverlappingEdits {
                    first: TextRange::new(cursor, prev_end),
                    second: edit.range,
                });
            }
        }

        out.push_str(&text[usize::from(cursor)..usize::from(edit.range.start())]);
        out.push_str(&edit.replacement);
        cursor = edit.range.end();
        prev_end = Some(edit.range.end());
    }

    out.push_str(&text[usize::from(cursor)..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_edits_handles_out_of_order_input() {
        let text = "abcdef";
        let edits = vec![
            TextEdit::new(TextRange::new(4.into(), 5.into()), "E"),
            TextEdit::new(TextRange::new(0.into(), 1.into()), "A"),
        ];
        assert_eq!(apply_edits(text, edits).unwrap(), "AbcdEf");
    }

    #[test]
    fn apply_edits_rejects_overlap() {
        let text = "abcdef";
        let edits = vec![
            TextEdit::new(TextRange::new(0.into(), 3.into()), "x"),
            TextEdit::new(TextRange::new(2.into(), 4.into()), "y"),
        ];
        assert!(apply_edits(text, edits).is_err());
    }
}
