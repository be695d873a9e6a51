//! The file-level item tree: package/import declarations and the nested
//! class/interface/enum/record hierarchy with field and method signatures
//! (spec.md §4.3a). Bodies are lowered lazily via [`crate::lowering`] — the
//! item tree only carries enough to resolve names and drive outline-style
//! providers (document symbols, code lens, folding).

use crate::lombok::LombokMetadata;
use jls_core::TextRange;
use jls_syntax::{parse_java, SyntaxKind::*, SyntaxNode};
use std::sync::atomic::{AtomicU32, Ordering};

/// A counter-based id, stable only within one parse of one file. True
/// cross-edit stability would need a content-addressed scheme (e.g. hashing
/// the enclosing class path + signature); that refinement is left for a
/// resolver-level cache key rather than baked into the tree itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

fn next_item_id() -> ItemId {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    ItemId(COUNTER.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    Enum,
    Record,
    AnnotationInterface,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamItem {
    pub name: String,
    pub type_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldItem {
    pub id: ItemId,
    pub name: String,
    pub type_name: String,
    pub modifiers: Vec<String>,
    pub range: TextRange,
    pub name_range: TextRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodItem {
    pub id: ItemId,
    pub name: String,
    pub return_type: Option<String>,
    pub params: Vec<ParamItem>,
    pub modifiers: Vec<String>,
    pub is_constructor: bool,
    pub range: TextRange,
    pub name_range: TextRange,
    pub body: Option<TextRange>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassItem {
    pub id: ItemId,
    pub kind: ClassKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub type_params: Vec<String>,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub fields: Vec<FieldItem>,
    pub methods: Vec<MethodItem>,
    pub nested: Vec<ClassItem>,
    pub range: TextRange,
    pub name_range: TextRange,
    pub lombok: LombokMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportItem {
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemTree {
    pub package: Option<String>,
    pub imports: Vec<ImportItem>,
    pub classes: Vec<ClassItem>,
}

pub fn lower_item_tree(text: &str) -> ItemTree {
    let parsed = parse_java(text);
    lower_item_tree_from_syntax(&parsed.syntax(), text)
}

pub fn lower_item_tree_from_syntax(root: &SyntaxNode, text: &str) -> ItemTree {
    let mut tree = ItemTree::default();

    for child in root.children() {
        match child.kind() {
            PACKAGE_DECL => tree.package = child.children().next().map(|n| qualified_name_text(&n)),
            IMPORT_DECL => tree.imports.push(lower_import(&child)),
            CLASS_DECL | INTERFACE_DECL | ENUM_DECL | RECORD_DECL => tree.classes.push(lower_class(&child, text)),
            _ => {}
        }
    }

    tree
}

fn lower_import(node: &SyntaxNode) -> ImportItem {
    let is_static = node.children_with_tokens().any(|e| e.as_token().is_some_and(|t| t.kind() == STATIC_KW));
    let qname = node.children().find(|n| n.kind() == QUALIFIED_NAME);
    let is_wildcard = qname.as_ref().is_some_and(|n| n.children_with_tokens().any(|e| e.as_token().is_some_and(|t| t.kind() == STAR)));
    let path = qname.map(|n| qualified_name_text(&n)).unwrap_or_default();
    ImportItem { path, is_static, is_wildcard }
}

fn qualified_name_text(node: &SyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| matches!(t.kind(), IDENT | DOT | STAR))
        .map(|t| t.text().to_string())
        .collect()
}

fn modifiers_of(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .find(|n| n.kind() == MODIFIER_LIST)
        .map(|list| {
            list.children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| t.kind().is_keyword())
                .map(|t| t.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn type_params_of(node: &SyntaxNode) -> Vec<String> {
    node.children()
        .find(|n| n.kind() == TYPE_PARAM_LIST)
        .map(|list| {
            list.children()
                .filter(|n| n.kind() == TYPE_PARAM)
                .filter_map(|p| p.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == IDENT))
                .map(|t| t.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn type_refs_of(node: &SyntaxNode, clause_kind: jls_syntax::SyntaxKind) -> Vec<String> {
    node.children()
        .find(|n| n.kind() == clause_kind)
        .map(|clause| clause.children().filter(|n| n.kind() == TYPE_REF).map(|n| type_ref_text(&n)).collect())
        .unwrap_or_default()
}

fn type_ref_text(node: &SyntaxNode) -> String {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == IDENT || t.kind() == DOT)
        .map(|t| t.text().to_string())
        .collect()
}

fn class_name(node: &SyntaxNode) -> (String, TextRange) {
    // The class/interface/enum/record name is the first direct `IDENT` token
    // after the keyword (modifiers precede it as a sibling node, not a
    // token, so this is unambiguous).
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == IDENT)
        .map(|t| (t.text().to_string(), t.text_range()))
        .unwrap_or_else(|| (String::new(), node.text_range()))
}

fn lower_class(node: &SyntaxNode, text: &str) -> ClassItem {
    let kind = match node.kind() {
        CLASS_DECL => ClassKind::Class,
        INTERFACE_DECL => ClassKind::Interface,
        ENUM_DECL => ClassKind::Enum,
        RECORD_DECL => ClassKind::Record,
        _ => ClassKind::AnnotationInterface,
    };
    let (name, name_range) = class_name(node);
    let modifiers = modifiers_of(node);
    let type_params = type_params_of(node);
    let extends = type_refs_of(node, EXTENDS_CLAUSE);
    let implements = type_refs_of(node, IMPLEMENTS_CLAUSE);

    let mut fields = Vec::new();
    let mut methods = Vec::new();
    let mut nested = Vec::new();

    let body = node.children().find(|n| matches!(n.kind(), CLASS_BODY | ENUM_BODY));
    if let Some(body) = body {
        for member in body.children() {
            match member.kind() {
                FIELD_DECL => fields.extend(lower_field(&member)),
                METHOD_DECL => methods.push(lower_method(&member, false)),
                CONSTRUCTOR_DECL => methods.push(lower_method(&member, true)),
                CLASS_DECL | INTERFACE_DECL | ENUM_DECL | RECORD_DECL => nested.push(lower_class(&member, text)),
                _ => {}
            }
        }
    }

    let lombok = LombokMetadata::derive(&modifiers, &fields, text);

    ClassItem { id: next_item_id(), kind, name, modifiers, type_params, extends, implements, fields, methods, nested, range: node.text_range(), name_range, lombok }
}

fn lower_field(node: &SyntaxNode) -> Vec<FieldItem> {
    let modifiers = modifiers_of(node);
    let type_name = node.children().find(|n| n.kind() == TYPE_REF).map(|n| type_ref_text(&n)).unwrap_or_default();
    node.children()
        .filter(|n| n.kind() == VARIABLE_DECLARATOR)
        .filter_map(|decl| {
            let tok = decl.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == IDENT)?;
            Some(FieldItem {
                id: next_item_id(),
                name: tok.text().to_string(),
                type_name: type_name.clone(),
                modifiers: modifiers.clone(),
                range: node.text_range(),
                name_range: tok.text_range(),
            })
        })
        .collect()
}

fn lower_method(node: &SyntaxNode, is_constructor: bool) -> MethodItem {
    let modifiers = modifiers_of(node);
    let return_type = if is_constructor { None } else { node.children().find(|n| n.kind() == TYPE_REF).map(|n| type_ref_text(&n)) };

    let (name, name_range) = if is_constructor {
        node.children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == IDENT)
            .map(|t| (t.text().to_string(), t.text_range()))
            .unwrap_or_else(|| (String::new(), node.text_range()))
    } else {
        // The method name is the `IDENT` token that is a *direct* child of
        // this node and precedes the `PARAM_LIST`, i.e. not one of the
        // tokens belonging to the return `TYPE_REF` subtree.
        let name_tok = node.children_with_tokens().find_map(|e| match e {
            rowan::NodeOrToken::Token(t) if t.kind() == IDENT => Some(t),
            _ => None,
        });
        name_tok.map(|t| (t.text().to_string(), t.text_range())).unwrap_or_else(|| (String::new(), node.text_range()))
    };

    let params = node
        .children()
        .find(|n| n.kind() == PARAM_LIST)
        .map(|list| {
            list.children()
                .filter(|n| n.kind() == PARAM)
                .map(|p| {
                    let type_name = p.children().find(|n| n.kind() == TYPE_REF).map(|n| type_ref_text(&n)).unwrap_or_default();
                    let name = p.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == IDENT).map(|t| t.text().to_string()).unwrap_or_default();
                    ParamItem { name, type_name }
                })
                .collect()
        })
        .unwrap_or_default();

    let body = node.children().find(|n| n.kind() == BLOCK).map(|n| n.text_range());

    MethodItem { id: next_item_id(), name, return_type, params, modifiers, is_constructor, range: node.text_range(), name_range, body }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowers_package_imports_and_a_simple_class() {
        let tree = lower_item_tree("package com.example;\nimport java.util.List;\nimport static java.lang.Math.*;\n\npublic class Foo extends Bar implements Baz {\n    private int x;\n    public int getX() { return x; }\n}\n");
        assert_eq!(tree.package.as_deref(), Some("com.example"));
        assert_eq!(tree.imports.len(), 2);
        assert!(tree.imports[1].is_static && tree.imports[1].is_wildcard);

        assert_eq!(tree.classes.len(), 1);
        let class = &tree.classes[0];
        assert_eq!(class.name, "Foo");
        assert_eq!(class.extends, vec!["Bar"]);
        assert_eq!(class.implements, vec!["Baz"]);
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.fields[0].name, "x");
        assert_eq!(class.methods.len(), 1);
        assert_eq!(class.methods[0].name, "getX");
    }

    #[test]
    fn lowers_nested_classes_and_constructors() {
        let tree = lower_item_tree("class Outer {\n    Outer(int x) {}\n    static class Inner {\n        int y;\n    }\n}\n");
        let outer = &tree.classes[0];
        assert_eq!(outer.methods.len(), 1);
        assert!(outer.methods[0].is_constructor);
        assert_eq!(outer.nested.len(), 1);
        assert_eq!(outer.nested[0].name, "Inner");
        assert_eq!(outer.nested[0].fields[0].name, "y");
    }

    #[test]
    fn multiple_declarators_in_one_field_decl_become_separate_fields() {
        let tree = lower_item_tree("class Foo { int a, b; }");
        assert_eq!(tree.classes[0].fields.len(), 2);
    }
}
