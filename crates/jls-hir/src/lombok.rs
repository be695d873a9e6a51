//! Lombok synthetic-member metadata (spec.md §3 "Lombok Metadata"). There is
//! no real annotation processor available, so Lombok support is modeled as a
//! description of which synthetic members a class *would* gain, derived from
//! its own annotations — not as expanded source the compiler actually runs.

use crate::item_tree::FieldItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticMemberKind {
    Getter,
    Setter,
    EqualsAndHashCode,
    ToString,
    AllArgsConstructor,
    NoArgsConstructor,
    RequiredArgsConstructor,
    Builder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticMember {
    pub kind: SyntheticMemberKind,
    pub name: String,
    /// Field names the member is derived from, when applicable (e.g. a
    /// getter is derived from exactly one field).
    pub source_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LombokMetadata {
    pub synthetic_members: Vec<SyntheticMember>,
}

impl LombokMetadata {
    pub fn is_lombok_annotated(&self) -> bool {
        !self.synthetic_members.is_empty()
    }

    /// Whether `text` contains the literal token `"lombok"` anywhere
    /// (import statement or fully-qualified annotation use) — the façade's
    /// workspace-wide Lombok source-set expansion trigger (spec.md §4.3)
    /// uses this exact, deliberately coarse check.
    pub fn file_mentions_lombok(text: &str) -> bool {
        jls_core::lex_identifiers(text).contains(&"lombok")
    }

    pub(crate) fn derive(class_modifiers: &[String], fields: &[FieldItem], source_text: &str) -> Self {
        let _ = class_modifiers;
        if !Self::file_mentions_lombok(source_text) {
            return Self::default();
        }

        let mut members = Vec::new();
        let annotations = annotation_names(source_text);

        if annotations.contains("Getter") || annotations.contains("Data") {
            for field in fields {
                members.push(SyntheticMember {
                    kind: SyntheticMemberKind::Getter,
                    name: getter_name(&field.name, &field.type_name),
                    source_fields: vec![field.name.clone()],
                });
            }
        }
        if annotations.contains("Setter") || annotations.contains("Data") {
            for field in fields.iter().filter(|f| !f.modifiers.iter().any(|m| m == "final")) {
                members.push(SyntheticMember {
                    kind: SyntheticMemberKind::Setter,
                    name: setter_name(&field.name),
                    source_fields: vec![field.name.clone()],
                });
            }
        }
        if annotations.contains("EqualsAndHashCode") || annotations.contains("Data") {
            members.push(SyntheticMember { kind: SyntheticMemberKind::EqualsAndHashCode, name: "equals".into(), source_fields: Vec::new() });
            members.push(SyntheticMember { kind: SyntheticMemberKind::EqualsAndHashCode, name: "hashCode".into(), source_fields: Vec::new() });
        }
        if annotations.contains("ToString") || annotations.contains("Data") {
            members.push(SyntheticMember { kind: SyntheticMemberKind::ToString, name: "toString".into(), source_fields: Vec::new() });
        }
        if annotations.contains("NoArgsConstructor") {
            members.push(SyntheticMember { kind: SyntheticMemberKind::NoArgsConstructor, name: "<init>".into(), source_fields: Vec::new() });
        }
        if annotations.contains("AllArgsConstructor") {
            members.push(SyntheticMember {
                kind: SyntheticMemberKind::AllArgsConstructor,
                name: "<init>".into(),
                source_fields: fields.iter().map(|f| f.name.clone()).collect(),
            });
        }
        if annotations.contains("RequiredArgsConstructor") {
            let required: Vec<String> = fields.iter().filter(|f| f.modifiers.iter().any(|m| m == "final")).map(|f| f.name.clone()).collect();
            members.push(SyntheticMember { kind: SyntheticMemberKind::RequiredArgsConstructor, name: "<init>".into(), source_fields: required });
        }
        if annotations.contains("Builder") {
            members.push(SyntheticMember { kind: SyntheticMemberKind::Builder, name: "builder".into(), source_fields: Vec::new() });
        }

        LombokMetadata { synthetic_members: members }
    }
}

fn getter_name(field: &str, type_name: &str) -> String {
    let prefix = if type_name == "boolean" { "is" } else { "get" };
    format!("{prefix}{}", capitalize(field))
}

fn setter_name(field: &str) -> String {
    format!("set{}", capitalize(field))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// A coarse per-file set of annotation simple names (`@Getter` -> `"Getter"`)
/// found by scanning identifier tokens after `@`. Good enough to drive
/// synthetic-member inference without a full annotation argument parse.
fn annotation_names(text: &str) -> std::collections::HashSet<&str> {
    let mut names = std::collections::HashSet::new();
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if c != '@' {
            continue;
        }
        let rest = &text[i + 1..];
        let end = rest.find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.')).unwrap_or(rest.len());
        let name = &rest[..end];
        let simple = name.rsplit('.').next().unwrap_or(name);
        if !simple.is_empty() {
            names.insert(simple);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_tree::lower_item_tree;

    #[test]
    fn non_lombok_file_has_no_synthetic_members() {
        let tree = lower_item_tree("class Foo { int x; }");
        assert!(!tree.classes[0].lombok.is_lombok_annotated());
    }

    #[test]
    fn data_annotation_synthesizes_getters_setters_equals_hashcode_tostring() {
        let source = "import lombok.Data;\n\n@Data\nclass Point {\n    private final int x;\n    private int y;\n}\n";
        let tree = lower_item_tree(source);
        let lombok = &tree.classes[0].lombok;
        let kinds: Vec<_> = lombok.synthetic_members.iter().map(|m| m.kind).collect();
        assert!(kinds.contains(&SyntheticMemberKind::Getter));
        assert!(kinds.contains(&SyntheticMemberKind::EqualsAndHashCode));
        assert!(kinds.contains(&SyntheticMemberKind::ToString));
        // `x` is final, so only `y` gets a setter.
        let setters: Vec<_> = lombok.synthetic_members.iter().filter(|m| m.kind == SyntheticMemberKind::Setter).collect();
        assert_eq!(setters.len(), 1);
        assert_eq!(setters[0].source_fields, vec!["y"]);
    }

    #[test]
    fn boolean_field_getter_uses_is_prefix() {
        let source = "import lombok.Getter;\n\n@Getter\nclass Flag {\n    private boolean enabled;\n}\n";
        let tree = lower_item_tree(source);
        let getter = &tree.classes[0].lombok.synthetic_members[0];
        assert_eq!(getter.name, "isEnabled");
    }
}
