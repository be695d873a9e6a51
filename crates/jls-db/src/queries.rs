//! The four auxiliary semantic queries spec.md §4.3 asks the compiler
//! facade for directly, rather than through a single-file resolve call:
//! `findTypeDeclaration`, `findAnywhere`, `findTypeReferences`, and
//! `findMemberReferences`. Each is workspace-wide, so each starts by
//! shortlisting candidate files from the lexical token index before parsing
//! anything — the same two-phase shape `jls-index` itself documents.

use jls_core::{FileId, Location};
use jls_hir::{ClassItem, Expr};
use jls_resolve::{accessibility_of, Accessibility};
use jls_syntax::{parse_java, SyntaxKind, SyntaxNode};

use crate::compile_task::CompileTask;

struct TypeCandidate {
    location: Location,
    package: String,
    accessibility: Accessibility,
}

impl CompileTask {
    /// Finds the declaration of the type named `simple_name`. Candidates
    /// with public visibility are preferred; only if none exists is the
    /// search retried restricted to `from_package`, since a package-private
    /// type can only ever be the intended target from within its own
    /// package — the single retry spec.md §4.3 calls for.
    pub fn find_type_declaration(&self, simple_name: &str, from_package: &str) -> Option<Location> {
        let candidates = self.type_candidates(simple_name);
        if let Some(found) = candidates.iter().find(|c| c.accessibility == Accessibility::Public) {
            return Some(found.location);
        }
        candidates.into_iter().find(|c| c.package == from_package).map(|c| c.location)
    }

    fn type_candidates(&self, simple_name: &str) -> Vec<TypeCandidate> {
        let mut out = Vec::new();
        for file in self.shortlisted_files(simple_name) {
            let tree = self.item_tree_checked(file);
            let package = tree.package.clone().unwrap_or_default();
            collect_type_candidates(&tree.classes, simple_name, file, &package, &mut out);
        }
        out
    }

    /// Every class/field/method declaration anywhere in the workspace named
    /// `simple_name` (spec.md §4.3 "find anywhere").
    pub fn find_anywhere(&self, simple_name: &str) -> Vec<Location> {
        let mut out = Vec::new();
        for file in self.shortlisted_files(simple_name) {
            let tree = self.item_tree_checked(file);
            collect_declarations(&tree.classes, simple_name, file, &mut out);
        }
        out
    }

    /// Every `TYPE_REF` in the workspace whose simple (rightmost-dotted)
    /// segment is `simple_name` — a syntactic over-approximation, since
    /// distinguishing `com.a.Widget` from `com.b.Widget` needs the resolver.
    pub fn find_type_references(&self, simple_name: &str) -> Vec<Location> {
        let mut out = Vec::new();
        for file in self.shortlisted_files(simple_name) {
            let Some(path) = self.path_of(file) else { continue };
            let Ok(text) = std::fs::read_to_string(path) else { continue };
            let parsed = parse_java(&text);
            collect_type_refs(&parsed.syntax(), simple_name, file, &mut out);
        }
        out
    }

    /// Every expression in the workspace that names `member_name` as a bare
    /// identifier or as the right-hand side of a field/method access
    /// (spec.md §4.3 "find member references"). This does not check that
    /// the receiver's type actually declares the member — a second pass
    /// through `jls-resolve` narrows false positives for callers that need
    /// precision over recall.
    pub fn find_member_references(&self, member_name: &str) -> Vec<Location> {
        let mut out = Vec::new();
        for file in self.shortlisted_files(member_name) {
            let tree = self.item_tree_checked(file);
            for class in &tree.classes {
                collect_member_refs_in_class(class, member_name, file, self, &mut out);
            }
        }
        out
    }

    fn shortlisted_files(&self, token: &str) -> Vec<FileId> {
        let candidate_paths = self.token_index.files_containing(token);
        self.files.iter().filter(|(_, path)| candidate_paths.contains(*path)).map(|(&file, _)| file).collect()
    }
}

fn collect_type_candidates(classes: &[ClassItem], simple_name: &str, file: FileId, package: &str, out: &mut Vec<TypeCandidate>) {
    for class in classes {
        if class.name == simple_name {
            out.push(TypeCandidate {
                location: Location { file, range: class.name_range },
                package: package.to_string(),
                accessibility: accessibility_of(&class.modifiers),
            });
        }
        collect_type_candidates(&class.nested, simple_name, file, package, out);
    }
}

fn collect_declarations(classes: &[ClassItem], simple_name: &str, file: FileId, out: &mut Vec<Location>) {
    for class in classes {
        if class.name == simple_name {
            out.push(Location { file, range: class.name_range });
        }
        for field in &class.fields {
            if field.name == simple_name {
                out.push(Location { file, range: field.name_range });
            }
        }
        for method in &class.methods {
            if method.name == simple_name {
                out.push(Location { file, range: method.name_range });
            }
        }
        collect_declarations(&class.nested, simple_name, file, out);
    }
}

fn collect_type_refs(node: &SyntaxNode, simple_name: &str, file: FileId, out: &mut Vec<Location>) {
    if node.kind() == SyntaxKind::TYPE_REF {
        for token in node.children_with_tokens().filter_map(|e| e.into_token()) {
            if token.kind() == SyntaxKind::IDENT && token.text() == simple_name {
                out.push(Location { file, range: token.text_range() });
            }
        }
    }
    for child in node.children() {
        collect_type_refs(&child, simple_name, file, out);
    }
}

fn collect_member_refs_in_class(class: &ClassItem, member_name: &str, file: FileId, task: &CompileTask, out: &mut Vec<Location>) {
    for method in &class.methods {
        if let Some(body_range) = method.body {
            if let Some(body) = jls_hir::queries::body(&task.db, file, body_range) {
                collect_member_refs_in_exprs(&body.exprs, member_name, file, out);
            }
        }
    }
    for nested in &class.nested {
        collect_member_refs_in_class(nested, member_name, file, task, out);
    }
}

fn collect_member_refs_in_exprs(exprs: &jls_hir::arena::Arena<Expr>, member_name: &str, file: FileId, out: &mut Vec<Location>) {
    for (_, expr) in exprs.iter() {
        match expr {
            Expr::Name { name, range } if name == member_name => out.push(Location { file, range: *range }),
            Expr::FieldAccess { name, range, .. } if name == member_name => out.push(Location { file, range: *range }),
            Expr::MethodRef { member, range, .. } if member == member_name => out.push(Location { file, range: *range }),
            _ => {}
        }
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
    fn finds_public_type_over_package_private_one_in_another_package() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("A.java");
        std::fs::write(&a, "package p;\nclass Widget {}\n").unwrap();
        let b = dir.path().join("B.java");
        std::fs::write(&b, "package q;\npublic class Widget {}\n").unwrap();

        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), a);
        sources.insert(FileId(1), b);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let found = task.find_type_declaration("Widget", "p").unwrap();
        assert_eq!(found.file, FileId(1));
    }

    #[test]
    fn retries_restricted_to_caller_package_when_only_package_private_candidates_exist() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("A.java");
        std::fs::write(&a, "package p;\nclass Widget {}\n").unwrap();

        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), a);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        assert!(task.find_type_declaration("Widget", "p").is_some());
        assert!(task.find_type_declaration("Widget", "other").is_none());
    }

    #[test]
    fn find_anywhere_locates_field_and_method_declarations() {
        let dir = tempdir().unwrap();
        let a = dir.path().join("A.java");
        std::fs::write(&a, "class A {\n  int count;\n  void count() {}\n}\n").unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), a);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let found = task.find_anywhere("count");
        assert_eq!(found.len(), 2);
    }
}
