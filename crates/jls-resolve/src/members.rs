//! Member listing (spec.md §4.3 "members of a type"): declared fields and
//! methods for a source class, or a binary type read off the classpath/JDK.
//! Neither side walks the supertype chain — each call answers "declared
//! here", leaving inherited-member flattening to the caller, which already
//! knows how deep it wants to walk.

use jls_classpath::JdkIndex;
use jls_hir::ClassItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Field,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub name: String,
    pub kind: MemberKind,
    pub modifiers: Vec<String>,
    /// For a field, its declared type; for a method, its JVM descriptor
    /// (`(I)Ljava/lang/String;`) when read from the classpath, or its
    /// source-level return type when read from a source file.
    pub signature: String,
}

pub fn members_of_source_class(class: &ClassItem) -> Vec<MemberInfo> {
    let mut members: Vec<MemberInfo> = class
        .fields
        .iter()
        .map(|f| MemberInfo { name: f.name.clone(), kind: MemberKind::Field, modifiers: f.modifiers.clone(), signature: f.type_name.clone() })
        .collect();
    members.extend(class.methods.iter().map(|m| MemberInfo {
        name: m.name.clone(),
        kind: MemberKind::Method,
        modifiers: m.modifiers.clone(),
        signature: m.return_type.clone().unwrap_or_else(|| "void".to_string()),
    }));
    members
}

#[derive(Debug, thiserror::Error)]
pub enum MembersError {
    #[error(transparent)]
    Index(#[from] jls_classpath::JdkIndexError),
    #[error(transparent)]
    ClassFile(#[from] jls_classfile::Error),
    #[error("{0} is not present in the JDK index")]
    NotFound(String),
}

/// Members of a JDK type, read lazily from its owning `.jmod` rather than
/// kept around after indexing (spec.md §4.4: only `(name, owning module)`
/// pairs are cached to disk).
pub fn members_of_jdk_class(jdk: &JdkIndex, binary_name: &str) -> Result<Vec<MemberInfo>, MembersError> {
    let internal_name = binary_name.replace('.', "/");
    let bytes = jdk.read_class_bytes(&internal_name)?.ok_or_else(|| MembersError::NotFound(binary_name.to_string()))?;
    let class = jls_classfile::ClassFile::parse(&bytes)?;
    let stub = jls_classfile::ClassStub::from_classfile(&class)?;

    let mut members: Vec<MemberInfo> = stub
        .fields
        .iter()
        .map(|f| MemberInfo { name: f.name.clone(), kind: MemberKind::Field, modifiers: modifiers_from_flags(f.access_flags), signature: f.descriptor.clone() })
        .collect();
    members.extend(
        stub.methods
            .iter()
            .map(|m| MemberInfo { name: m.name.clone(), kind: MemberKind::Method, modifiers: modifiers_from_flags(m.access_flags), signature: m.descriptor.clone() }),
    );
    Ok(members)
}

fn modifiers_from_flags(flags: u16) -> Vec<String> {
    let mut mods = Vec::new();
    if flags & jls_classfile::ACC_PUBLIC != 0 {
        mods.push("public".to_string());
    }
    if flags & jls_classfile::ACC_PROTECTED != 0 {
        mods.push("protected".to_string());
    }
    if flags & jls_classfile::ACC_PRIVATE != 0 {
        mods.push("private".to_string());
    }
    if flags & jls_classfile::ACC_STATIC != 0 {
        mods.push("static".to_string());
    }
    if flags & jls_classfile::ACC_FINAL != 0 {
        mods.push("final".to_string());
    }
    if flags & jls_classfile::ACC_ABSTRACT != 0 {
        mods.push("abstract".to_string());
    }
    mods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_declared_fields_and_methods_of_a_source_class() {
        let tree = jls_hir::lower_item_tree("class Foo {\n  public int x;\n  public String name() { return null; }\n}\n");
        let members = members_of_source_class(&tree.classes[0]);
        assert_eq!(members.len(), 2);
        assert!(members.iter().any(|m| m.name == "x" && m.kind == MemberKind::Field));
        assert!(members.iter().any(|m| m.name == "name" && m.kind == MemberKind::Method));
    }

    #[test]
    fn modifiers_from_flags_decodes_public_static_final() {
        let flags = jls_classfile::ACC_PUBLIC | jls_classfile::ACC_STATIC | jls_classfile::ACC_FINAL;
        let mods = modifiers_from_flags(flags);
        assert_eq!(mods, vec!["public", "static", "final"]);
    }
}
