//! "What declaration is at this position" (spec.md §4.3 "element at a
//! path"), the query hover/definition/rename all start from.

use jls_core::TextSize;
use jls_hir::{ClassItem, FieldItem, ItemTree, MethodItem};

#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    Class(&'a ClassItem),
    Method(&'a MethodItem),
    Field(&'a FieldItem),
}

impl<'a> Element<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Element::Class(c) => &c.name,
            Element::Method(m) => &m.name,
            Element::Field(f) => &f.name,
        }
    }

    pub fn name_range(&self) -> jls_core::TextRange {
        match self {
            Element::Class(c) => c.name_range,
            Element::Method(m) => m.name_range,
            Element::Field(f) => f.name_range,
        }
    }
}

/// The innermost class/method/field declaration whose name token covers
/// `offset`, falling back to the innermost declaration whose body covers
/// `offset` when no name token matches (e.g. hovering inside a method body
/// still reports that method as the enclosing element).
pub fn element_at_offset(tree: &ItemTree, offset: TextSize) -> Option<Element<'_>> {
    find_in_classes(&tree.classes, offset)
}

fn find_in_classes(classes: &[ClassItem], offset: TextSize) -> Option<Element<'_>> {
    for class in classes {
        if class.name_range.contains(offset) {
            return Some(Element::Class(class));
        }
        if !class.range.contains(offset) {
            continue;
        }
        for field in &class.fields {
            if field.name_range.contains(offset) {
                return Some(Element::Field(field));
            }
        }
        for method in &class.methods {
            if method.name_range.contains(offset) {
                return Some(Element::Method(method));
            }
        }
        if let Some(found) = find_in_classes(&class.nested, offset) {
            return Some(found);
        }
        for method in &class.methods {
            if let Some(body) = method.body {
                if body.contains(offset) {
                    return Some(Element::Method(method));
                }
            }
        }
        return Some(Element::Class(class));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_method_by_name_token() {
        let tree = jls_hir::lower_item_tree("class Foo {\n  void bar() {}\n}\n");
        let name_range = tree.classes[0].methods[0].name_range;
        let element = element_at_offset(&tree, name_range.start()).unwrap();
        assert_eq!(element.name(), "bar");
        assert!(matches!(element, Element::Method(_)));
    }

    #[test]
    fn falls_back_to_enclosing_method_inside_its_body() {
        let tree = jls_hir::lower_item_tree("class Foo {\n  void bar() { int x = 1; }\n}\n");
        let body = tree.classes[0].methods[0].body.unwrap();
        let inside = body.start() + jls_core::TextSize::from(3);
        let element = element_at_offset(&tree, inside).unwrap();
        assert_eq!(element.name(), "bar");
    }

    #[test]
    fn finds_field_by_name_token() {
        let tree = jls_hir::lower_item_tree("class Foo {\n  int x;\n}\n");
        let name_range = tree.classes[0].fields[0].name_range;
        let element = element_at_offset(&tree, name_range.start()).unwrap();
        assert!(matches!(element, Element::Field(_)));
    }
}
