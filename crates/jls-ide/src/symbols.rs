//! `textDocument/documentSymbol` and `workspace/symbol` (spec.md §4.5): a
//! flattened outline of a file's item tree, or a substring search across
//! every file the compile task knows about.

use jls_core::{FileId, TextRange};
use jls_db::CompileTask;
use jls_hir::{ClassItem, ClassKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Class,
    Interface,
    Enum,
    Record,
    Method,
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub range: TextRange,
    pub selection_range: TextRange,
    pub children: Vec<DocumentSymbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceSymbol {
    pub name: String,
    pub kind: SymbolKind,
    pub file: FileId,
    pub range: TextRange,
}

pub fn document_symbols(task: &CompileTask, file: FileId) -> Vec<DocumentSymbol> {
    let tree = task.item_tree_checked(file);
    tree.classes.iter().map(class_symbol).collect()
}

fn class_symbol(class: &ClassItem) -> DocumentSymbol {
    let mut children: Vec<DocumentSymbol> = class
        .fields
        .iter()
        .map(|f| DocumentSymbol {
            name: f.name.clone(),
            kind: SymbolKind::Field,
            range: f.range,
            selection_range: f.name_range,
            children: Vec::new(),
        })
        .collect();

    children.extend(class.methods.iter().map(|m| DocumentSymbol {
        name: m.name.clone(),
        kind: SymbolKind::Method,
        range: m.range,
        selection_range: m.name_range,
        children: Vec::new(),
    }));

    children.extend(class.nested.iter().map(class_symbol));

    DocumentSymbol {
        name: class.name.clone(),
        kind: class_kind_symbol(class.kind),
        range: class.range,
        selection_range: class.name_range,
        children,
    }
}

fn class_kind_symbol(kind: ClassKind) -> SymbolKind {
    match kind {
        ClassKind::Class => SymbolKind::Class,
        ClassKind::Interface => SymbolKind::Interface,
        ClassKind::Enum => SymbolKind::Enum,
        ClassKind::Record => SymbolKind::Record,
        ClassKind::AnnotationInterface => SymbolKind::Interface,
    }
}

/// Every class/method/field across every file in the compile task whose
/// name contains `query` (case-insensitive, empty query matches everything).
pub fn workspace_symbols(task: &CompileTask, query: &str) -> Vec<WorkspaceSymbol> {
    let query = query.to_lowercase();
    let mut out = Vec::new();
    for file in task.file_ids() {
        let tree = task.item_tree_checked(file);
        collect_workspace_symbols(file, &tree.classes, &query, &mut out);
    }
    out
}

fn collect_workspace_symbols(file: FileId, classes: &[ClassItem], query: &str, out: &mut Vec<WorkspaceSymbol>) {
    for class in classes {
        if class.name.to_lowercase().contains(query) {
            out.push(WorkspaceSymbol { name: class.name.clone(), kind: class_kind_symbol(class.kind), file, range: class.name_range });
        }
        for method in &class.methods {
            if method.name.to_lowercase().contains(query) {
                out.push(WorkspaceSymbol { name: method.name.clone(), kind: SymbolKind::Method, file, range: method.name_range });
            }
        }
        for field in &class.fields {
            if field.name.to_lowercase().contains(query) {
                out.push(WorkspaceSymbol { name: field.name.clone(), kind: SymbolKind::Field, file, range: field.name_range });
            }
        }
        collect_workspace_symbols(file, &class.nested, query, out);
    }
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
    fn document_symbols_nest_fields_and_methods_under_their_class() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  int x;\n  void run() {}\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let symbols = document_symbols(&task, FileId(0));
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].children.len(), 2);
    }

    #[test]
    fn workspace_symbols_filters_by_substring() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class Widget {\n  void runTask() {}\n}\nclass Other {\n  void skip() {}\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let symbols = workspace_symbols(&task, "run");
        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "runTask");
    }
}
