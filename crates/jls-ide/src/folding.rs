//! `textDocument/foldingRange` (spec.md §4.5): brace-delimited bodies,
//! runs of consecutive imports, and multi-line comments.

use jls_core::TextRange;
use jls_syntax::{parse_java, SyntaxKind, SyntaxNode};
use rowan::NodeOrToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldKind {
    Braces,
    Imports,
    Comment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldingRange {
    pub range: TextRange,
    pub kind: FoldKind,
}

const BODY_KINDS: &[SyntaxKind] = &[
    SyntaxKind::CLASS_BODY,
    SyntaxKind::ENUM_BODY,
    SyntaxKind::BLOCK,
];

pub fn folding_ranges(text: &str) -> Vec<FoldingRange> {
    let root = parse_java(text).syntax();
    let mut out = Vec::new();
    collect_brace_folds(&root, &mut out);
    collect_import_folds(&root, &mut out);
    collect_comment_folds(&root, &mut out);
    out.sort_by_key(|f| f.range.start());
    out
}

fn collect_brace_folds(node: &SyntaxNode, out: &mut Vec<FoldingRange>) {
    if BODY_KINDS.contains(&node.kind()) {
        let open = crate::syntax_util::direct_child_token(node, SyntaxKind::L_BRACE);
        let close = crate::syntax_util::direct_child_token(node, SyntaxKind::R_BRACE);
        if let (Some(open), Some(close)) = (open, close) {
            if open.text_range().end() < close.text_range().start() {
                out.push(FoldingRange {
                    range: TextRange::new(open.text_range().end(), close.text_range().start()),
                    kind: FoldKind::Braces,
                });
            }
        }
    }
    for child in node.children() {
        collect_brace_folds(&child, out);
    }
}

/// Folds a run of 2+ consecutive imports, keeping the first one visible and
/// collapsing the rest — the usual editor convention for import blocks.
fn collect_import_folds(root: &SyntaxNode, out: &mut Vec<FoldingRange>) {
    let mut first_end = None;
    let mut run_end = None;

    let mut flush = |first: &mut Option<jls_core::TextSize>, end: &mut Option<jls_core::TextSize>, out: &mut Vec<FoldingRange>| {
        if let (Some(s), Some(e)) = (*first, *end) {
            if s < e {
                out.push(FoldingRange { range: TextRange::new(s, e), kind: FoldKind::Imports });
            }
        }
        *first = None;
        *end = None;
    };

    for child in root.children() {
        if child.kind() == SyntaxKind::IMPORT_DECL {
            if first_end.is_none() {
                first_end = Some(child.text_range().end());
            } else {
                run_end = Some(child.text_range().end());
            }
        } else {
            flush(&mut first_end, &mut run_end, out);
        }
    }
    flush(&mut first_end, &mut run_end, out);
}

fn collect_comment_folds(root: &SyntaxNode, out: &mut Vec<FoldingRange>) {
    let mut run_start = None;
    let mut run_end = None;

    for element in root.descendants_with_tokens() {
        match element {
            NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::LINE_COMMENT => {
                if run_start.is_none() {
                    run_start = Some(tok.text_range().start());
                }
                run_end = Some(tok.text_range().end());
            }
            NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::WHITESPACE => {
                // A single blank-line-free newline between comments keeps the run going;
                // anything else (two blank lines, or non-comment content) ends it.
                if tok.text().matches('\n').count() > 1 {
                    flush_comment_run(&mut run_start, &mut run_end, out);
                }
            }
            NodeOrToken::Token(tok) if tok.kind() == SyntaxKind::BLOCK_COMMENT => {
                flush_comment_run(&mut run_start, &mut run_end, out);
                if tok.text().contains('\n') {
                    out.push(FoldingRange { range: tok.text_range(), kind: FoldKind::Comment });
                }
            }
            _ => flush_comment_run(&mut run_start, &mut run_end, out),
        }
    }
    flush_comment_run(&mut run_start, &mut run_end, out);
}

fn flush_comment_run(start: &mut Option<jls_core::TextSize>, end: &mut Option<jls_core::TextSize>, out: &mut Vec<FoldingRange>) {
    if let (Some(s), Some(e)) = (*start, *end) {
        if s < e {
            out.push(FoldingRange { range: TextRange::new(s, e), kind: FoldKind::Comment });
        }
    }
    *start = None;
    *end = None;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_a_class_body() {
        let text = "class A {\n  int x;\n}\n";
        let ranges = folding_ranges(text);
        assert!(ranges.iter().any(|f| f.kind == FoldKind::Braces));
    }

    #[test]
    fn folds_a_run_of_consecutive_imports() {
        let text = "import a.B;\nimport a.C;\nimport a.D;\n\nclass A {}\n";
        let ranges = folding_ranges(text);
        let fold = ranges.iter().find(|f| f.kind == FoldKind::Imports).unwrap();
        assert_eq!(&text[fold.range], "\nimport a.C;\nimport a.D;");
    }

    #[test]
    fn does_not_fold_a_single_import() {
        let text = "import a.B;\n\nclass A {}\n";
        let ranges = folding_ranges(text);
        assert!(!ranges.iter().any(|f| f.kind == FoldKind::Imports));
    }
}
