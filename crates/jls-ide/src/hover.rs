//! `textDocument/hover` (spec.md §4.5): the signature of whatever
//! class/method/field declaration encloses the cursor, plus a note when it
//! carries Lombok-synthesized members.

use jls_core::{FileId, TextSize};
use jls_db::CompileTask;
use jls_resolve::{element_at_offset, Element};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverInfo {
    pub signature: String,
    pub range: jls_core::TextRange,
}

pub fn hover(task: &CompileTask, file: FileId, offset: TextSize) -> Option<HoverInfo> {
    let tree = task.item_tree_checked(file);
    let element = element_at_offset(&tree, offset)?;

    let signature = match element {
        Element::Class(class) => {
            let kind = match class.kind {
                jls_hir::ClassKind::Class => "class",
                jls_hir::ClassKind::Interface => "interface",
                jls_hir::ClassKind::Enum => "enum",
                jls_hir::ClassKind::Record => "record",
                jls_hir::ClassKind::AnnotationInterface => "@interface",
            };
            let mut sig = format!("{} {} {}", class.modifiers.join(" "), kind, class.name).trim().to_string();
            if class.lombok.is_lombok_annotated() {
                sig.push_str(&format!(" (lombok: +{} synthetic members)", class.lombok.synthetic_members.len()));
            }
            sig
        }
        Element::Method(method) => {
            let params = method.params.iter().map(|p| format!("{} {}", p.type_name, p.name)).collect::<Vec<_>>().join(", ");
            let ret = method.return_type.clone().unwrap_or_else(|| "void".to_string());
            format!("{} {}({}) {}", method.modifiers.join(" "), method.name, params, ret).trim().to_string()
        }
        Element::Field(field) => format!("{} {} {}", field.modifiers.join(" "), field.type_name, field.name).trim().to_string(),
    };

    Some(HoverInfo { signature, range: element.name_range() })
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
    fn hovers_a_method_signature() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "class A {\n  public int getX() { return 1; }\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("getX").unwrap() as u32);
        let info = hover(&task, FileId(0), offset).unwrap();
        assert!(info.signature.contains("getX"));
        assert!(info.signature.contains("public"));
    }

    #[test]
    fn hover_notes_lombok_synthetic_members() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("A.java");
        let text = "import lombok.Getter;\n\n@Getter\nclass Point {\n  private int x;\n}\n";
        std::fs::write(&file, text).unwrap();
        let mut sources = BTreeMap::new();
        sources.insert(FileId(0), file);
        let task = CompileTask::build(&sources, empty_universe()).unwrap();

        let offset = TextSize::from(text.find("Point").unwrap() as u32);
        let info = hover(&task, FileId(0), offset).unwrap();
        assert!(info.signature.contains("lombok"));
    }
}
