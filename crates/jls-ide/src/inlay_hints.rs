//! `textDocument/inlayHint` (spec.md §4.5): parameter-name hints at call
//! sites, matched against same-file method declarations by name and arity —
//! no type checking, just enough to label an argument list.

use jls_core::{FileId, TextSize};
use jls_db::CompileTask;
use jls_hir::{ClassItem, MethodItem};
use jls_syntax::{parse_java, SyntaxKind, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlayHint {
    pub position: TextSize,
    pub label: String,
}

pub fn inlay_hints(task: &CompileTask, file: FileId) -> Vec<InlayHint> {
    let Some(path) = task.path_of(file) else { return Vec::new() };
    let Ok(text) = std::fs::read_to_string(path) else { return Vec::new() };
    let tree = task.item_tree_checked(file);
    let root = parse_java(&text).syntax();

    let mut out = Vec::new();
    collect_call_hints(&root, &tree.classes, &text, &mut out);
    out
}

fn collect_call_hints(node: &SyntaxNode, classes: &[ClassItem], text: &str, out: &mut Vec<InlayHint>) {
    if node.kind() == SyntaxKind::CALL_EXPR {
        if let (Some(callee), Some(arg_list)) = (callee_name(node), crate::syntax_util::direct_child_node(node, SyntaxKind::ARG_LIST)) {
            if let Some(method) = find_method(classes, &callee) {
                let args: Vec<SyntaxNode> = arg_list.children().collect();
                if args.len() == method.params.len() {
                    for (arg, param) in args.iter().zip(&method.params) {
                        if arg_is_named(arg, &param.name, text) {
                            continue;
                        }
                        out.push(InlayHint { position: arg.text_range().start(), label: format!("{}: ", param.name) });
                    }
                }
            }
        }
    }
    for child in node.children() {
        collect_call_hints(&child, classes, text, out);
    }
}

fn arg_is_named(arg: &SyntaxNode, param_name: &str, text: &str) -> bool {
    arg.kind() == SyntaxKind::NAME_EXPR && &text[arg.text_range()] == param_name
}

fn callee_name(call: &SyntaxNode) -> Option<String> {
    if let Some(ident) = call.children_with_tokens().filter_map(|e| e.into_token()).filter(|t| t.kind() == SyntaxKind::IDENT).last() {
        return Some(ident.text().to_string());
    }
    let name_expr = call.children().find(|n| n.kind() == SyntaxKind::NAME_EXPR)?;
    crate::syntax_util::direct_child_token(&name_expr, SyntaxKind::IDENT).map(|t| t.text().to_string())
}

fn find_method<'a>(classes: &'a [ClassItem], name: &str) -> Option<&'a MethodItem> {
    for class in classes {
        if let Some(method) = class.methods.iter().find(|m| m.name == name) {
            return Some(method);
        }
        if let Some(found) = find_method(&class.nested, name) {
            return Some(found);
        }
    }
    None
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
    fn labels_each_argument_with_its_parameter_name() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  void move(int dx, int dy) {}\n  void m() { move(1, 2); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let hints = inlay_hints(&task, FileId(0));
        assert_eq!(hints.len(), 2);
        assert_eq!(hints[0].label, "dx: ");
        assert_eq!(hints[1].label, "dy: ");
    }

    #[test]
    fn skips_an_argument_whose_name_already_matches_the_parameter() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  void move(int dx) {}\n  void m(int dx) { move(dx); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let hints = inlay_hints(&task, FileId(0));
        assert!(hints.is_empty());
    }
}
