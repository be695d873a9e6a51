//! `textDocument/codeAction` (spec.md §4.5): quick fixes attached to
//! diagnostics by stable code, plus the `generate constructor` refactor
//! gated by `jls_config`'s field-name filter.

use jls_core::{FileId, TextEdit, TextRange, TextSize, WorkspaceEdit};
use jls_config::CodeActionsConfig;
use jls_db::CompileTask;

pub struct CodeAction {
    pub title: String,
    pub edit: WorkspaceEdit,
}

/// Quick fixes for diagnostics that cover `range` — today just "remove
/// unused import", keyed off the `unused_import` diagnostic code (spec.md
/// §4.5: code actions are attached to diagnostics by stable code, not
/// matched against message text).
pub fn code_actions_for_diagnostics(file: FileId, diagnostics: &[jls_core::Diagnostic], range: TextRange) -> Vec<CodeAction> {
    diagnostics
        .iter()
        .filter(|d| d.code.as_deref() == Some("unused_import") && (d.range.contains_range(range) || range.contains_range(d.range)))
        .map(|d| {
            let mut edit = WorkspaceEdit::default();
            edit.add_edit(file, TextEdit::delete(d.range));
            CodeAction { title: "Remove unused import".to_string(), edit }
        })
        .collect()
}

/// Inserts a constructor assigning every matching field, honoring
/// `code_actions.generate_constructor.include` (spec.md §6): an empty
/// filter includes every field, otherwise only fields whose name matches at
/// least one pattern.
pub fn generate_constructor(task: &CompileTask, file: FileId, offset: TextSize, config: &CodeActionsConfig) -> Option<CodeAction> {
    let tree = task.item_tree_checked(file);
    let class = enclosing_class(&tree, offset)?;
    let patterns: Vec<regex::Regex> = config.generate_constructor.include.iter().filter_map(|p| regex::Regex::new(p).ok()).collect();

    let fields: Vec<_> = class
        .fields
        .iter()
        .filter(|f| !f.modifiers.iter().any(|m| m == "static"))
        .filter(|f| patterns.is_empty() || patterns.iter().any(|re| re.is_match(&f.name)))
        .collect();
    if fields.is_empty() {
        return None;
    }

    let params = fields.iter().map(|f| format!("{} {}", f.type_name, f.name)).collect::<Vec<_>>().join(", ");
    let assignments = fields.iter().map(|f| format!("        this.{name} = {name};\n", name = f.name)).collect::<String>();
    let ctor = format!("\n    public {}({}) {{\n{}    }}\n", class.name, params, assignments);

    let insert_at = class.range.end() - TextSize::from(1);
    let mut edit = WorkspaceEdit::default();
    edit.add_edit(file, TextEdit::insert(insert_at, ctor));
    Some(CodeAction { title: "Generate constructor".to_string(), edit })
}

fn enclosing_class<'a>(tree: &'a jls_hir::ItemTree, offset: TextSize) -> Option<&'a jls_hir::ClassItem> {
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
    fn generates_a_constructor_for_every_instance_field() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class Point {\n  int x;\n  int y;\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("int x").unwrap() as u32);
        let action = generate_constructor(&task, FileId(0), offset, &CodeActionsConfig::default()).unwrap();
        let edits = &action.edit.changes[&FileId(0)];
        assert_eq!(edits.len(), 1);
        assert!(edits[0].replacement.contains("this.x = x"));
        assert!(edits[0].replacement.contains("this.y = y"));
    }

    #[test]
    fn include_filter_restricts_generated_fields() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class Point {\n  int x;\n  int internalCache;\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let mut config = CodeActionsConfig::default();
        config.generate_constructor.include = vec!["^x$".to_string()];
        let offset = TextSize::from(text.find("int x").unwrap() as u32);
        let action = generate_constructor(&task, FileId(0), offset, &config).unwrap();
        let edits = &action.edit.changes[&FileId(0)];
        assert!(edits[0].replacement.contains("this.x = x"));
        assert!(!edits[0].replacement.contains("internalCache"));
    }
}
