//! `textDocument/definition` (spec.md §4.5): resolves a type reference to
//! its declaration, a member reference to its declaring field/method, and a
//! record-accessor call to the record component it reads — none of which
//! `jls_hir`'s item tree models as a real method, so the last case is
//! handled directly off the raw syntax tree.

use jls_core::{FileId, Location, TextSize};
use jls_db::CompileTask;
use jls_hir::ItemTree;
use jls_resolve::{erase, Scope};
use jls_syntax::{parse_java, SyntaxKind};

use crate::element_ext::record_components;
use crate::resolve_ctx::TaskResolveContext;
use crate::syntax_util;

pub fn definition(task: &CompileTask, file: FileId, offset: TextSize) -> Vec<Location> {
    let Some(path) = task.path_of(file) else { return Vec::new() };
    let Ok(text) = std::fs::read_to_string(path) else { return Vec::new() };
    let parsed = parse_java(&text);
    let root = parsed.syntax();

    let Some(token) = syntax_util::token_at_offset(&root, offset) else { return Vec::new() };
    if token.kind() != SyntaxKind::IDENT {
        return Vec::new();
    }
    let name = token.text().to_string();
    let Some(parent) = token.parent() else { return Vec::new() };

    match parent.kind() {
        SyntaxKind::TYPE_REF | SyntaxKind::QUALIFIED_NAME => type_definition(task, file, &name),
        SyntaxKind::FIELD_ACCESS_EXPR | SyntaxKind::METHOD_REF_EXPR => member_or_record_component_definition(task, file, offset, &name),
        SyntaxKind::CALL_EXPR | SyntaxKind::NAME_EXPR | SyntaxKind::NAME_REF => {
            let mut found = member_or_record_component_definition(task, file, offset, &name);
            if found.is_empty() {
                found = task.find_anywhere(&name);
            }
            found
        }
        _ => Vec::new(),
    }
}

fn type_definition(task: &CompileTask, file: FileId, name: &str) -> Vec<Location> {
    let tree = task.item_tree_checked(file);
    let from_package = tree.package.clone().unwrap_or_default();
    task.find_type_declaration(name, &from_package).into_iter().collect()
}

/// A call like `point.x()` should land on record component `x`'s
/// declaration when `x` is a record accessor and there is no hand-written
/// method by that name; otherwise it falls back to the ordinary member
/// search (spec.md §9 notes this class of chain resolution is inherently
/// heuristic).
fn member_or_record_component_definition(task: &CompileTask, file: FileId, offset: TextSize, name: &str) -> Vec<Location> {
    if let Some(receiver_type) = receiver_type_of(task, file, offset) {
        if let Some(binary_name) = match &receiver_type {
            jls_resolve::ResolvedType::Source { binary_name } => Some(binary_name.clone()),
            jls_resolve::ResolvedType::Classpath { .. } => None,
        } {
            let simple = binary_name.rsplit(['.', '$']).next().unwrap_or(&binary_name).to_string();
            for candidate_file in task.file_ids() {
                let tree = task.item_tree_checked(candidate_file);
                if let Some(class) = find_class(&tree.classes, &simple) {
                    if let Some(method) = class.methods.iter().find(|m| m.name == name) {
                        return vec![Location { file: candidate_file, range: method.name_range }];
                    }
                    if let Some(path) = task.path_of(candidate_file) {
                        if let Ok(candidate_text) = std::fs::read_to_string(path) {
                            let candidate_root = parse_java(&candidate_text).syntax();
                            if let Some(candidate_class) = find_class_node(&candidate_root, &simple) {
                                if let Some(component) = record_components(&candidate_class).into_iter().find(|c| c.name == name) {
                                    return vec![Location { file: candidate_file, range: component.range }];
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    task.find_anywhere(name)
}

fn receiver_type_of(task: &CompileTask, file: FileId, offset: TextSize) -> Option<jls_resolve::ResolvedType> {
    let tree = task.item_tree_checked(file);
    let class = enclosing_class(&tree, offset)?;
    let method = class.methods.iter().find(|m| m.body.is_some_and(|b| b.contains(offset)))?;
    let path = task.path_of(file)?;
    let text = std::fs::read_to_string(path).ok()?;
    let root = parse_java(&text).syntax();
    let token = syntax_util::token_at_offset(&root, offset)?;
    // A record-accessor *call* like `p.x()` wraps its receiver, dot, name and
    // arg list in a CALL_EXPR rather than a FIELD_ACCESS_EXPR — the bare
    // `p.x` form is the only one that parses as FIELD_ACCESS_EXPR.
    let container = syntax_util::ancestor_of_any_kind(&token.parent()?, &[SyntaxKind::FIELD_ACCESS_EXPR, SyntaxKind::CALL_EXPR])?;
    let receiver_node = container.children().next()?;
    if receiver_node.kind() != SyntaxKind::NAME_EXPR {
        return None;
    }
    let receiver_token = receiver_node.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == SyntaxKind::IDENT)?;
    let receiver_name = receiver_token.text().to_string();

    let type_name = method
        .params
        .iter()
        .find(|p| p.name == receiver_name)
        .map(|p| p.type_name.clone())
        .or_else(|| class.fields.iter().find(|f| f.name == receiver_name).map(|f| f.type_name.clone()))?;

    let erased = erase(&type_name);
    let scope = Scope::at_offset(&tree, offset);
    let ctx = TaskResolveContext { task };
    scope.resolve_simple_name(&erased, &ctx)
}

fn enclosing_class<'a>(tree: &'a ItemTree, offset: TextSize) -> Option<&'a jls_hir::ClassItem> {
    fn walk(classes: &[jls_hir::ClassItem], offset: TextSize) -> Option<&jls_hir::ClassItem> {
        for class in classes {
            if class.range.contains(offset) || class.range.end() == offset {
                return walk(&class.nested, offset).or(Some(class));
            }
        }
        None
    }
    walk(&tree.classes, offset)
}

fn find_class<'a>(classes: &'a [jls_hir::ClassItem], name: &str) -> Option<&'a jls_hir::ClassItem> {
    for class in classes {
        if class.name == name {
            return Some(class);
        }
        if let Some(found) = find_class(&class.nested, name) {
            return Some(found);
        }
    }
    None
}

fn find_class_node(root: &jls_syntax::SyntaxNode, name: &str) -> Option<jls_syntax::SyntaxNode> {
    root.descendants().find(|n| {
        matches!(n.kind(), SyntaxKind::CLASS_DECL | SyntaxKind::RECORD_DECL | SyntaxKind::INTERFACE_DECL | SyntaxKind::ENUM_DECL)
            && n.children_with_tokens().filter_map(|e| e.into_token()).any(|t| t.kind() == SyntaxKind::IDENT && t.text() == name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_classpath::{Classpath, JdkIndex, Universe};
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn empty_universe() -> Arc<Universe> {
        Arc::new(Universe::new(JdkIndex::empty(), &Classpath::default(), None))
    }

    #[test]
    fn type_ref_resolves_to_class_declaration() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A { Widget w; }\nclass Widget {}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("Widget w").unwrap() as u32 + 1);
        let locations = definition(&task, FileId(0), offset);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].file, FileId(0));
    }

    #[test]
    fn record_accessor_call_resolves_to_its_component() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "record Point(int x, int y) {}\nclass Use {\n  Point p;\n  void m() { int v = p.x(); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.rfind("x()").unwrap() as u32);
        let locations = definition(&task, FileId(0), offset);
        assert_eq!(locations.len(), 1);
        assert_eq!(&text[locations[0].range], "x");
    }
}
