//! `textDocument/references` (spec.md §4.5). A field annotated for a Lombok
//! getter is findable both by its own name and by calls to the getter
//! Lombok would synthesize for it — spec.md §8's Lombok scenario.

use jls_core::{FileId, Location, TextSize};
use jls_db::CompileTask;
use jls_hir::{ClassItem, SyntheticMemberKind};
use jls_resolve::{element_at_offset, Element};
use jls_syntax::SyntaxKind;

use crate::element_ext::local_binding_at;

pub fn find_references(task: &CompileTask, file: FileId, offset: TextSize, include_declaration: bool) -> Vec<Location> {
    if let Some(path) = task.path_of(file) {
        if let Ok(text) = std::fs::read_to_string(path) {
            let root = jls_syntax::parse_java(&text).syntax();
            if let Some(binding) = local_binding_at(&root, offset) {
                let ranges = crate::element_ext::local_references(&root, &binding);
                return ranges
                    .into_iter()
                    .filter(|r| include_declaration || *r != binding.declaration_range)
                    .map(|range| Location { file, range })
                    .collect();
            }
        }
    }

    let tree = task.item_tree_checked(file);
    let Some(element) = element_at_offset(&tree, offset) else { return Vec::new() };

    let mut results = match element {
        Element::Class(class) => {
            let mut refs = task.find_type_references(&class.name);
            if include_declaration {
                refs.push(Location { file, range: class.name_range });
            }
            refs
        }
        Element::Method(method) => {
            let mut refs = task.find_member_references(&method.name);
            if include_declaration {
                refs.push(Location { file, range: method.name_range });
            }
            refs
        }
        Element::Field(field) => {
            let mut refs = task.find_member_references(&field.name);
            refs.extend(lombok_getter_references(task, &tree, &field.name));
            if include_declaration {
                refs.push(Location { file, range: field.name_range });
            }
            refs
        }
    };

    results.sort_by_key(|l| (l.file, l.range.start()));
    results.dedup();
    results
}

/// References to the synthesized getter of a `@Getter`/`@Data` field, found
/// by re-deriving the getter's name and running the same member-reference
/// search on it.
fn lombok_getter_references(task: &CompileTask, tree: &jls_hir::ItemTree, field_name: &str) -> Vec<Location> {
    let Some(class) = owning_class(&tree.classes, field_name) else { return Vec::new() };
    let getter = class
        .lombok
        .synthetic_members
        .iter()
        .find(|m| m.kind == SyntheticMemberKind::Getter && m.source_fields.iter().any(|f| f == field_name));
    let Some(getter) = getter else { return Vec::new() };
    task.find_member_references(&getter.name)
}

fn owning_class<'a>(classes: &'a [ClassItem], field_name: &str) -> Option<&'a ClassItem> {
    for class in classes {
        if class.fields.iter().any(|f| f.name == field_name) {
            return Some(class);
        }
        if let Some(found) = owning_class(&class.nested, field_name) {
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
    fn lombok_getter_field_is_found_via_its_synthesized_accessor_call() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "import lombok.Getter;\n\n@Getter\nclass Point {\n  private int x;\n}\nclass Use {\n  void m(Point p) { int v = p.getX(); }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("x;").unwrap() as u32);
        let refs = find_references(&task, FileId(0), offset, true);
        assert!(refs.iter().any(|r| &text[r.range] == "getX"));
    }

    #[test]
    fn local_variable_references_exclude_the_field_of_the_same_name() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  int x;\n  void m() { int x = 1; x++; }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let local_decl_offset = TextSize::from(text.rfind("int x = 1").unwrap() as u32 + 4);
        let refs = find_references(&task, FileId(0), local_decl_offset, true);
        assert_eq!(refs.len(), 2);
    }
}
