//! `textDocument/completion` (spec.md §4.5): instance-member completion
//! after a `.`, and simple-name completion (keywords, enclosing members,
//! classpath-visible types) everywhere else.

use jls_core::{FileId, TextSize};
use jls_db::CompileTask;
use jls_hir::{ClassItem, ItemTree};
use jls_resolve::{erase, members_of_jdk_class, members_of_source_class, MemberInfo, MemberKind, Scope};
use jls_syntax::{parse_java, SyntaxKind};

use crate::resolve_ctx::TaskResolveContext;
use crate::syntax_util;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionItemKind {
    Field,
    Method,
    Class,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionItem {
    pub label: String,
    pub kind: CompletionItemKind,
    pub detail: Option<String>,
}

const KEYWORDS: &[&str] = &[
    "public", "private", "protected", "static", "final", "void", "int", "boolean", "class", "interface", "return", "new", "this", "super", "if", "else", "for", "while", "try", "catch",
];

pub fn complete(task: &CompileTask, file: FileId, offset: TextSize, text: &str) -> Vec<CompletionItem> {
    let parsed = parse_java(text);
    let root = parsed.syntax();

    if let Some(dot) = syntax_util::preceding_token(&root, offset) {
        if dot.kind() == SyntaxKind::DOT {
            return member_completions(task, file, &root, dot.text_range().start());
        }
    }

    simple_name_completions(task, file, offset, text)
}

fn member_completions(task: &CompileTask, file: FileId, root: &jls_syntax::SyntaxNode, dot_offset: TextSize) -> Vec<CompletionItem> {
    let Some(receiver) = syntax_util::preceding_token(root, dot_offset) else { return Vec::new() };
    let tree = task.item_tree_checked(file);

    if receiver.kind() == SyntaxKind::THIS_KW {
        return match enclosing_class_at(&tree, dot_offset) {
            Some(enclosing) => members_of_source_class(enclosing).into_iter().map(to_completion_item).collect(),
            None => Vec::new(),
        };
    }

    let receiver_type = if receiver.kind() == SyntaxKind::IDENT {
        resolve_receiver_type(task, &tree, dot_offset, receiver.text())
    } else {
        None
    };

    let Some(resolved) = receiver_type else { return Vec::new() };
    match resolved {
        jls_resolve::ResolvedType::Source { binary_name } => {
            let simple = binary_name.rsplit(['.', '$']).next().unwrap_or(&binary_name);
            if let Some(class) = find_class_by_simple_name(&tree.classes, simple) {
                return members_of_source_class(class).into_iter().map(to_completion_item).collect();
            }
            for other in task.file_ids() {
                let other_tree = task.item_tree_checked(other);
                if let Some(class) = find_class_by_simple_name(&other_tree.classes, simple) {
                    return members_of_source_class(class).into_iter().map(to_completion_item).collect();
                }
            }
            Vec::new()
        }
        jls_resolve::ResolvedType::Classpath { binary_name } => {
            members_of_jdk_class(task.universe().jdk(), &binary_name).unwrap_or_default().into_iter().map(to_completion_item).collect()
        }
    }
}

/// Best-effort receiver typing: `this`'s own fields/params declared in the
/// enclosing method, erased and resolved through `Scope`. No local
/// flow-sensitive inference — a receiver whose type can't be read straight
/// off a field or parameter declaration yields no completions.
fn resolve_receiver_type(task: &CompileTask, tree: &ItemTree, offset: TextSize, receiver_name: &str) -> Option<jls_resolve::ResolvedType> {
    let class = enclosing_class_at(tree, offset)?;
    let method = class.methods.iter().find(|m| m.body.is_some_and(|b| b.contains(offset)))?;

    let type_name = method
        .params
        .iter()
        .find(|p| p.name == receiver_name)
        .map(|p| p.type_name.clone())
        .or_else(|| class.fields.iter().find(|f| f.name == receiver_name).map(|f| f.type_name.clone()))?;

    let erased = erase(&type_name);
    let scope = Scope::at_offset(tree, offset);
    let ctx = TaskResolveContext { task };
    scope.resolve_simple_name(&erased, &ctx)
}

fn enclosing_class_at<'a>(tree: &'a ItemTree, offset: TextSize) -> Option<&'a ClassItem> {
    fn walk(classes: &[ClassItem], offset: TextSize) -> Option<&ClassItem> {
        for class in classes {
            if class.range.contains(offset) || class.range.end() == offset {
                return walk(&class.nested, offset).or(Some(class));
            }
        }
        None
    }
    walk(&tree.classes, offset)
}

fn find_class_by_simple_name<'a>(classes: &'a [ClassItem], name: &str) -> Option<&'a ClassItem> {
    for class in classes {
        if class.name == name {
            return Some(class);
        }
        if let Some(found) = find_class_by_simple_name(&class.nested, name) {
            return Some(found);
        }
    }
    None
}

fn to_completion_item(member: MemberInfo) -> CompletionItem {
    let kind = match member.kind {
        MemberKind::Field => CompletionItemKind::Field,
        MemberKind::Method => CompletionItemKind::Method,
    };
    CompletionItem { label: member.name, kind, detail: Some(member.signature) }
}

fn simple_name_completions(task: &CompileTask, file: FileId, offset: TextSize, text: &str) -> Vec<CompletionItem> {
    let prefix = current_identifier_prefix(text, offset);
    let tree = task.item_tree_checked(file);
    let mut items = Vec::new();

    for kw in KEYWORDS.iter().filter(|k| k.starts_with(prefix.as_str())) {
        items.push(CompletionItem { label: kw.to_string(), kind: CompletionItemKind::Keyword, detail: None });
    }

    if let Some(class) = enclosing_class_at(&tree, offset) {
        for member in members_of_source_class(class) {
            if member.name.starts_with(prefix.as_str()) {
                items.push(to_completion_item(member));
            }
        }
    }

    for simple_name in task.universe().class_names_with_prefix(&prefix) {
        items.push(CompletionItem { label: simple_name.clone(), kind: CompletionItemKind::Class, detail: None });
    }

    items
}

fn current_identifier_prefix(text: &str, offset: TextSize) -> String {
    let offset = usize::from(offset).min(text.len());
    let start = text[..offset].rfind(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$')).map(|i| i + 1).unwrap_or(0);
    text[start..offset].to_string()
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
    fn this_dot_offers_enclosing_class_members() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  int count;\n  void m() { this. }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("this. ").unwrap() as u32 + 5);
        let items = complete(&task, FileId(0), offset, text);
        assert!(items.iter().any(|i| i.label == "count" && i.kind == CompletionItemKind::Field));
    }

    #[test]
    fn field_receiver_completes_members_of_its_declared_source_type() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  Widget widget;\n  void m() { widget. }\n}\nclass Widget { int size; }\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("widget. }").unwrap() as u32 + 7);
        let items = complete(&task, FileId(0), offset, text);
        assert!(items.iter().any(|i| i.label == "size"));
    }
}
