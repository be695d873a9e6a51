//! The narrow seam `jls-db` implements to provide HIR lowering with file
//! contents without this crate depending on `jls-vfs` or the compiler
//! façade — `jls-hir` only ever needs "what's the text of this file".

use crate::hir::Body;
use crate::item_tree::ItemTree;
use crate::lowering::lower_body;
use jls_core::FileId;
use jls_syntax::{parse_java, SyntaxKind, SyntaxNode};
use std::sync::Arc;

pub trait HirDatabase {
    fn file_text(&self, file: FileId) -> Arc<str>;
}

pub fn item_tree(db: &dyn HirDatabase, file: FileId) -> Arc<ItemTree> {
    let text = db.file_text(file);
    Arc::new(crate::item_tree::lower_item_tree(&text))
}

/// Lowers the body of the method/constructor/initializer whose `BLOCK` (or,
/// for an expression-bodied initializer, the initializer expression node)
/// sits at `body_range` within `file`.
pub fn body(db: &dyn HirDatabase, file: FileId, body_range: jls_core::TextRange) -> Option<Body> {
    let text = db.file_text(file);
    let parsed = parse_java(&text);
    let node = find_node_at_range(&parsed.syntax(), body_range, SyntaxKind::BLOCK)?;
    Some(lower_body(&node))
}

pub fn constructor_body(db: &dyn HirDatabase, file: FileId, body_range: jls_core::TextRange) -> Option<Body> {
    body(db, file, body_range)
}

pub fn initializer_body(db: &dyn HirDatabase, file: FileId, body_range: jls_core::TextRange) -> Option<Body> {
    body(db, file, body_range)
}

fn find_node_at_range(root: &SyntaxNode, range: jls_core::TextRange, kind: SyntaxKind) -> Option<SyntaxNode> {
    root.descendants().find(|n| n.kind() == kind && n.text_range() == range)
}
