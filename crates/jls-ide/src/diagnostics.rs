//! `textDocument/publishDiagnostics` (spec.md §4.5 "lint"): parse errors plus
//! the unused-import check spec.md §8's first scenario exercises.

use jls_core::{Diagnostic, FileId, Severity};
use jls_db::CompileTask;
use jls_syntax::parse_java;

pub fn lint(task: &CompileTask, file: FileId) -> Vec<Diagnostic> {
    let Some(path) = task.path_of(file) else { return Vec::new() };
    let Ok(text) = std::fs::read_to_string(path) else { return Vec::new() };

    let mut diagnostics = Vec::new();
    let parsed = parse_java(&text);
    for error in &parsed.errors {
        diagnostics.push(Diagnostic::new(error.range, Severity::Error, error.message.clone()));
    }

    diagnostics.extend(unused_import_diagnostics(task, file, &text));
    diagnostics.sort_by_key(sort_key);
    diagnostics
}

/// `(severity, line-start, line-end)` ordering, matching spec.md §4.5's
/// `(severity, line, column)` diagnostic order.
fn sort_key(d: &Diagnostic) -> (u8, u32, u32) {
    let rank = match d.severity {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
        Severity::Hint => 3,
    };
    (rank, u32::from(d.range.start()), u32::from(d.range.end()))
}

fn unused_import_diagnostics(task: &CompileTask, file: FileId, text: &str) -> Vec<Diagnostic> {
    let tree = task.item_tree_checked(file);
    let mut out = Vec::new();

    for import in &tree.imports {
        if import.is_wildcard || import.is_static {
            continue;
        }
        let Some(simple_name) = import.path.rsplit('.').next() else { continue };
        if simple_name.is_empty() {
            continue;
        }
        if is_referenced_outside_import(text, simple_name) {
            continue;
        }
        let Some(range) = import_statement_range(text, &import.path) else { continue };
        out.push(
            Diagnostic::new(range, Severity::Warning, format!("unused import '{}'", import.path)).with_code("unused_import"),
        );
    }

    out
}

/// Whether `simple_name` occurs anywhere in the file other than inside its
/// own `import` statement. A coarse identifier-run scan, same discipline
/// `jls_index`'s token index already uses for its own shortlisting — never
/// semantic, but cheap and good enough to gate a warning on.
fn is_referenced_outside_import(text: &str, simple_name: &str) -> bool {
    let mut seen_outside_import = false;
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("import ") {
            continue;
        }
        if jls_core::lex_identifiers(line).contains(&simple_name) {
            seen_outside_import = true;
            break;
        }
    }
    seen_outside_import
}

fn import_statement_range(text: &str, import_path: &str) -> Option<jls_core::TextRange> {
    let needle = format!("import {import_path}");
    let start = text.find(&needle)?;
    let line_end = text[start..].find(['\n', ';']).map(|i| start + i).unwrap_or(text.len());
    Some(jls_core::TextRange::new((start as u32).into(), (line_end as u32).into()))
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
    fn flags_an_unused_single_type_import() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "import java.util.List;\nimport java.util.Map;\n\nclass A {\n  Map<String, String> m;\n}\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let diags = lint(&task, FileId(0));
        let unused: Vec<_> = diags.iter().filter(|d| d.code.as_deref() == Some("unused_import")).collect();
        assert_eq!(unused.len(), 1);
        assert!(unused[0].message.contains("java.util.List"));
    }

    #[test]
    fn wildcard_imports_are_never_flagged() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "import java.util.*;\n\nclass A {}\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let diags = lint(&task, FileId(0));
        assert!(diags.iter().all(|d| d.code.as_deref() != Some("unused_import")));
    }

    #[test]
    fn surfaces_parse_errors() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        std::fs::write(&file, "class A {\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let diags = lint(&task, FileId(0));
        assert!(diags.iter().any(|d| d.severity == Severity::Error));
    }
}
