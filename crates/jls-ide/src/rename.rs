//! `textDocument/rename` and `textDocument/prepareRename` (spec.md §4.5):
//! renames a local/parameter purely within its own scope, or a
//! class/method/field everywhere `references.rs` can already find it.

use jls_core::{FileId, TextEdit, TextRange, TextSize, WorkspaceEdit};
use jls_db::CompileTask;
use jls_resolve::element_at_offset;
use jls_syntax::parse_java;

use crate::element_ext::{local_binding_at, local_references};
use crate::references::find_references;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrepareRenameResult {
    pub range: TextRange,
    pub placeholder: String,
}

pub fn prepare_rename(task: &CompileTask, file: FileId, offset: TextSize) -> Option<PrepareRenameResult> {
    if let Some(path) = task.path_of(file) {
        if let Ok(text) = std::fs::read_to_string(path) {
            let root = parse_java(&text).syntax();
            if let Some(binding) = local_binding_at(&root, offset) {
                return Some(PrepareRenameResult { range: binding.declaration_range, placeholder: binding.name });
            }
        }
    }

    let tree = task.item_tree_checked(file);
    let element = element_at_offset(&tree, offset)?;
    if !element.name_range().contains(offset) {
        return None;
    }
    Some(PrepareRenameResult { range: element.name_range(), placeholder: element.name().to_string() })
}

pub fn rename(task: &CompileTask, file: FileId, offset: TextSize, new_name: &str) -> Option<WorkspaceEdit> {
    if let Some(path) = task.path_of(file) {
        if let Ok(text) = std::fs::read_to_string(path) {
            let root = parse_java(&text).syntax();
            if let Some(binding) = local_binding_at(&root, offset) {
                let mut edit = WorkspaceEdit::default();
                for range in local_references(&root, &binding) {
                    edit.add_edit(file, TextEdit::new(range, new_name));
                }
                return Some(edit);
            }
        }
    }

    let mut edit = WorkspaceEdit::default();
    for location in find_references(task, file, offset, true) {
        edit.add_edit(location.file, TextEdit::new(location.range, new_name));
    }
    if edit.is_empty() {
        return None;
    }
    Some(edit)
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
    fn renames_a_parameter_within_its_method_only() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  void m(int x) { x = x + 1; }\n  void n(int x) { x = 2; }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("int x) { x = x + 1").unwrap() as u32 + 4);
        let edit = rename(&task, FileId(0), offset, "value").unwrap();
        assert_eq!(edit.changes[&FileId(0)].len(), 3);
    }

    #[test]
    fn prepare_rename_on_a_class_name_returns_its_own_range() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class Widget {}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("Widget").unwrap() as u32);
        let result = prepare_rename(&task, FileId(0), offset).unwrap();
        assert_eq!(result.placeholder, "Widget");
    }
}
