//! `textDocument/signatureHelp` (spec.md §4.5a): which parameter is active
//! inside an open call, matched against same-file methods by name and arity.

use jls_core::{FileId, TextSize};
use jls_db::CompileTask;
use jls_hir::{ClassItem, MethodItem};
use jls_syntax::{parse_java, SyntaxKind, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    pub label: String,
    pub params: Vec<String>,
    pub active_param: usize,
}

pub fn signature_help(task: &CompileTask, file: FileId, offset: TextSize) -> Option<SignatureInfo> {
    let path = task.path_of(file)?;
    let text = std::fs::read_to_string(path).ok()?;
    let root = parse_java(&text).syntax();
    let tree = task.item_tree_checked(file);

    let token = crate::syntax_util::preceding_token(&root, offset)?;
    let call = crate::syntax_util::ancestor_of_kind(&token.parent()?, SyntaxKind::CALL_EXPR)?;
    let arg_list = crate::syntax_util::direct_child_node(&call, SyntaxKind::ARG_LIST)?;
    if !arg_list.text_range().contains(offset) {
        return None;
    }

    let callee = callee_name(&call)?;
    let method = find_method(&tree.classes, &callee)?;

    let active_param = active_param_index(&arg_list, offset);
    let params: Vec<String> = method.params.iter().map(|p| format!("{} {}", p.type_name, p.name)).collect();
    let label = format!("{}({})", method.name, params.join(", "));
    Some(SignatureInfo { label, params, active_param })
}

fn active_param_index(arg_list: &SyntaxNode, offset: TextSize) -> usize {
    let commas_before = arg_list
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::COMMA && t.text_range().start() < offset)
        .count();
    commas_before
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
    fn reports_the_second_parameter_as_active_after_a_comma() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  void move(int dx, int dy) {}\n  void m() { move(1, 2); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.rfind("2);").unwrap() as u32);
        let help = signature_help(&task, FileId(0), offset).unwrap();
        assert_eq!(help.active_param, 1);
        assert_eq!(help.params, vec!["int dx", "int dy"]);
    }
}
