//! The part of "what's at this position" that `jls_hir`'s item tree can't
//! answer: locals, parameters, and record components. None of the three
//! carry a per-declaration range in the HIR (`ParamItem` has no range at
//! all, and a `LocalVarDecl`'s declarators are a bare `(name, init)` pair),
//! so this walks the raw syntax tree directly instead.

use jls_core::{TextRange, TextSize};
use jls_syntax::{SyntaxKind, SyntaxNode};

#[derive(Debug, Clone)]
pub struct LocalBinding {
    pub name: String,
    pub declaration_range: TextRange,
    /// The method/constructor body (or, for a parameter, the whole
    /// method/constructor) the binding is visible in. References outside
    /// this range are never considered.
    pub scope: TextRange,
}

/// The parameter or local-variable declaration whose name token covers
/// `offset`, if any. Field declarations are deliberately excluded — those
/// already go through `jls_hir`/`jls_resolve`.
pub fn local_binding_at(root: &SyntaxNode, offset: TextSize) -> Option<LocalBinding> {
    let token = crate::syntax_util::token_at_offset(root, offset)?;
    if token.kind() != SyntaxKind::IDENT {
        return None;
    }
    let parent = token.parent()?;

    match parent.kind() {
        SyntaxKind::PARAM => {
            let owner = crate::syntax_util::ancestor_of_any_kind(&parent, &[SyntaxKind::METHOD_DECL, SyntaxKind::CONSTRUCTOR_DECL])?;
            Some(LocalBinding { name: token.text().to_string(), declaration_range: token.text_range(), scope: owner.text_range() })
        }
        SyntaxKind::VARIABLE_DECLARATOR => {
            let field_decl = crate::syntax_util::ancestor_of_kind(&parent, SyntaxKind::FIELD_DECL);
            if field_decl.is_some() {
                return None;
            }
            let owner = crate::syntax_util::ancestor_of_any_kind(&parent, &[SyntaxKind::BLOCK, SyntaxKind::FOR_STMT, SyntaxKind::FOR_EACH_STMT, SyntaxKind::TRY_STMT])?;
            Some(LocalBinding { name: token.text().to_string(), declaration_range: token.text_range(), scope: owner.text_range() })
        }
        _ => None,
    }
}

/// Every occurrence of `binding.name` as a bare `NAME_EXPR`/`NAME_REF`
/// identifier within `binding.scope`, plus the declaration site itself.
/// Shadowing by a nested re-declaration of the same name is not modeled —
/// a rare case left as a known imprecision, the same way spec.md already
/// accepts heuristic imprecision for synthetic accessor chains.
pub fn local_references(root: &SyntaxNode, binding: &LocalBinding) -> Vec<TextRange> {
    let mut out = vec![binding.declaration_range];
    collect_name_tokens(root, binding, &mut out);
    out.sort_by_key(|r| r.start());
    out.dedup();
    out
}

fn collect_name_tokens(node: &SyntaxNode, binding: &LocalBinding, out: &mut Vec<TextRange>) {
    if !binding.scope.contains_range(node.text_range()) && !node.text_range().contains_range(binding.scope) {
        return;
    }
    for child in node.children_with_tokens() {
        match child {
            rowan::NodeOrToken::Token(tok) => {
                if tok.kind() == SyntaxKind::IDENT && tok.text() == binding.name && binding.scope.contains_range(tok.text_range()) {
                    out.push(tok.text_range());
                }
            }
            rowan::NodeOrToken::Node(n) => collect_name_tokens(&n, binding, out),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordComponent {
    pub name: String,
    pub range: TextRange,
}

/// The components declared in a `record`'s header, which javac and Lombok
/// alike materialize as synthetic zero-arg accessor methods — the thing
/// spec.md's go-to-definition scenario for record accessors has to land on,
/// since `jls_hir`'s item tree does not lower `RECORD_HEADER` into fields.
pub fn record_components(class_node: &SyntaxNode) -> Vec<RecordComponent> {
    let Some(header) = class_node.children().find(|n| n.kind() == SyntaxKind::RECORD_HEADER) else {
        return Vec::new();
    };
    header
        .children()
        .filter(|n| n.kind() == SyntaxKind::RECORD_COMPONENT)
        .filter_map(|component| {
            let tok = component.children_with_tokens().filter_map(|e| e.into_token()).find(|t| t.kind() == SyntaxKind::IDENT)?;
            Some(RecordComponent { name: tok.text().to_string(), range: tok.text_range() })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_syntax::parse_java;

    #[test]
    fn finds_parameter_binding_and_its_uses() {
        let text = "class C { void m(int x) { System.out.println(x); x = x + 1; } }";
        let root = parse_java(text).syntax();
        let param_decl_offset = TextSize::from(text.find("int x").unwrap() as u32 + 4);
        let binding = local_binding_at(&root, param_decl_offset).unwrap();
        assert_eq!(binding.name, "x");
        let refs = local_references(&root, &binding);
        assert_eq!(refs.len(), 4);
    }

    #[test]
    fn local_var_declarator_is_found_not_the_field() {
        let text = "class C { int x; void m() { int y = x; y++; } }";
        let root = parse_java(text).syntax();
        let local_decl_offset = TextSize::from(text.rfind("int y").unwrap() as u32 + 4);
        let binding = local_binding_at(&root, local_decl_offset).unwrap();
        assert_eq!(binding.name, "y");
        assert_eq!(local_references(&root, &binding).len(), 2);
    }

    #[test]
    fn record_components_are_found_in_the_header() {
        let text = "record Point(int x, int y) {}";
        let root = parse_java(text).syntax();
        let class = root.children().find(|n| n.kind() == SyntaxKind::RECORD_DECL).unwrap();
        let components = record_components(&class);
        assert_eq!(components.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(), vec!["x", "y"]);
    }
}
