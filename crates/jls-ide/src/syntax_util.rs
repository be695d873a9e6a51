//! Small rowan-tree helpers shared by every provider that locates or
//! classifies a node at a cursor offset (spec.md §9 "cross-cutting tree
//! walks" — every provider is a tree walker with a small amount of shared
//! context).

use jls_core::TextSize;
use jls_syntax::{SyntaxKind, SyntaxNode, SyntaxToken};
use rowan::TokenAtOffset;

/// The token the cursor is "in", right-biased so that a caret immediately
/// after a `.` lands on whatever identifier follows it rather than the dot
/// itself.
pub fn token_at_offset(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(tok) => Some(tok),
        TokenAtOffset::Between(_, right) => Some(right),
    }
}

/// Same as [`token_at_offset`] but left-biased, for callers that want "the
/// thing just typed" rather than "the thing about to be typed".
pub fn token_at_offset_left_biased(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(tok) => Some(tok),
        TokenAtOffset::Between(left, _) => Some(left),
    }
}

pub fn ancestor_of_kind(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.ancestors().find(|n| n.kind() == kind)
}

pub fn ancestor_of_any_kind(node: &SyntaxNode, kinds: &[SyntaxKind]) -> Option<SyntaxNode> {
    node.ancestors().find(|n| kinds.contains(&n.kind()))
}

/// The nearest non-trivia token before `offset`, used to classify what
/// construct the cursor is inside of when it sits in empty space (e.g.
/// right after a `.` with nothing typed yet).
pub fn preceding_token(root: &SyntaxNode, offset: TextSize) -> Option<SyntaxToken> {
    let mut tok = token_at_offset_left_biased(root, offset)?;
    while tok.text_range().end() > offset || tok.kind().is_trivia() {
        tok = tok.prev_token()?;
    }
    Some(tok)
}

pub fn direct_child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == kind)
}

pub fn direct_child_node(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_syntax::parse_java;

    #[test]
    fn token_at_offset_is_right_biased_after_a_dot() {
        let text = "class C { void m() { this.foo(); } }";
        let root = parse_java(text).syntax();
        let dot = text.find('.').unwrap() as u32;
        let tok = token_at_offset(&root, (dot + 1).into()).unwrap();
        assert_eq!(tok.text(), "foo");
    }
}
