//! `textDocument/formatting` (spec.md §4.5a): a line-based reformatter —
//! trims trailing whitespace, reindents by brace depth, and normalizes the
//! file to end with exactly one newline. No token-level pretty-printing.

use jls_core::{TextEdit, TextRange, TextSize};

const INDENT_UNIT: &str = "    ";

pub fn format_document(text: &str) -> Vec<TextEdit> {
    let mut edits = Vec::new();
    let mut depth: i32 = 0;
    let mut offset = TextSize::from(0);

    let mut lines = text.split('\n').peekable();
    while let Some(line) = lines.next() {
        let is_last = lines.peek().is_none();
        let line_len = TextSize::from(line.len() as u32);
        let line_range = TextRange::new(offset, offset + line_len);

        let trimmed = line.trim_end();
        let content = trimmed.trim_start();
        let this_line_depth = if content.starts_with('}') { (depth - 1).max(0) } else { depth };

        let reformatted = if content.is_empty() { String::new() } else { format!("{}{content}", INDENT_UNIT.repeat(this_line_depth as usize)) };

        for ch in content.chars() {
            match ch {
                '{' => depth += 1,
                '}' => depth = (depth - 1).max(0),
                _ => {}
            }
        }

        if reformatted != line && !(is_last && line.is_empty()) {
            edits.push(TextEdit::new(line_range, reformatted));
        }

        offset += line_len + TextSize::from(1);
    }

    normalize_trailing_newline(text, &mut edits);
    edits
}

/// Collapses any run of blank lines at end-of-file down to a single
/// trailing newline.
fn normalize_trailing_newline(text: &str, edits: &mut Vec<TextEdit>) {
    if text.is_empty() {
        return;
    }
    let trimmed_len = text.trim_end_matches('\n').len();
    let trailing_newlines = text.len() - trimmed_len;
    if trailing_newlines != 1 {
        let range = TextRange::new(TextSize::from(trimmed_len as u32), TextSize::from(text.len() as u32));
        edits.push(TextEdit::new(range, "\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_whitespace() {
        let text = "class A {   \n  int x;\n}\n";
        let edits = format_document(text);
        assert!(edits.iter().any(|e| &text[e.range] == "class A {   " && e.replacement == "class A {"));
    }

    #[test]
    fn reindents_a_nested_block_by_brace_depth() {
        let text = "class A {\nvoid m() {\nint x;\n}\n}\n";
        let edits = format_document(text);
        let fixed = edits.iter().find(|e| &text[e.range] == "int x;").unwrap();
        assert_eq!(fixed.replacement, "        int x;");
    }

    #[test]
    fn collapses_extra_trailing_blank_lines() {
        let text = "class A {}\n\n\n";
        let edits = format_document(text);
        assert!(edits.iter().any(|e| e.replacement == "\n" && &text[e.range] == "\n\n\n"));
    }
}
