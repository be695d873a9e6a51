//! `textDocument/codeLens` (spec.md §4.5): a "N references" lens above every
//! class and method declaration, reusing the same reference search
//! `textDocument/references` answers with.

use jls_core::{FileId, TextRange};
use jls_db::CompileTask;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeLens {
    pub range: TextRange,
    pub title: String,
}

pub fn code_lenses(task: &CompileTask, file: FileId) -> Vec<CodeLens> {
    let tree = task.item_tree_checked(file);
    let mut lenses = Vec::new();
    collect_lenses(task, &tree.classes, &mut lenses);
    lenses
}

fn collect_lenses(task: &CompileTask, classes: &[jls_hir::ClassItem], out: &mut Vec<CodeLens>) {
    for class in classes {
        let count = task.find_type_references(&class.name).len();
        out.push(CodeLens { range: class.name_range, title: reference_title(count) });

        for method in &class.methods {
            let count = task.find_member_references(&method.name).len();
            out.push(CodeLens { range: method.name_range, title: reference_title(count) });
        }

        collect_lenses(task, &class.nested, out);
    }
}

fn reference_title(count: usize) -> String {
    match count {
        0 => "no references".to_string(),
        1 => "1 reference".to_string(),
        n => format!("{n} references"),
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
    fn counts_references_to_a_class_and_its_methods() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class Widget {\n  void run() {}\n}\nclass Use {\n  void m(Widget w) { w.run(); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let lenses = code_lenses(&task, FileId(0));
        let run_lens = lenses.iter().find(|l| &text[l.range] == "run").unwrap();
        assert_eq!(run_lens.title, "1 reference");
    }
}
