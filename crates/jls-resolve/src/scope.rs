//! Simple-name -> type resolution (spec.md §4.3 "scope at a path"), in the
//! order javac itself applies (JLS §6.5.5): enclosing type nest, same
//! compilation unit, single-type imports, same package, type-import-on-demand
//! (wildcard imports), then the implicit `java.lang.*` import.

use jls_hir::{ClassItem, ImportItem, ItemTree};

use crate::context::ResolveContext;
use crate::types::ResolvedType;

pub struct Scope<'a> {
    pub package: &'a str,
    pub imports: &'a [ImportItem],
    /// The chain of classes enclosing the point being resolved, outermost
    /// first. Empty when resolving at the top level of a file.
    pub enclosing: Vec<&'a ClassItem>,
    pub top_level: &'a [ClassItem],
}

impl<'a> Scope<'a> {
    pub fn at_offset(tree: &'a ItemTree, offset: jls_core::TextSize) -> Self {
        let mut enclosing = Vec::new();
        find_enclosing(&tree.classes, offset, &mut enclosing);
        Scope { package: tree.package.as_deref().unwrap_or(""), imports: &tree.imports, enclosing, top_level: &tree.classes }
    }

    pub fn resolve_simple_name(&self, name: &str, ctx: &dyn ResolveContext) -> Option<ResolvedType> {
        if let Some(binary_name) = self.resolve_in_enclosing_nest(name) {
            return Some(ResolvedType::Source { binary_name });
        }
        if let Some(binary_name) = resolve_in_classes(self.top_level, name, &[]) {
            return Some(ResolvedType::Source { binary_name: qualify(self.package, &binary_name) });
        }
        for import in self.imports.iter().filter(|i| !i.is_wildcard && !i.is_static) {
            if import.path.rsplit('.').next() == Some(name) {
                return classify(ctx, &import.path);
            }
        }
        for candidate in ctx.source_classes_in_package(self.package) {
            if candidate.rsplit(['.', '$']).next() == Some(name) {
                return Some(ResolvedType::Source { binary_name: candidate });
            }
        }
        let same_package_binary = qualify(self.package, name);
        if ctx.classpath().contains(&same_package_binary) {
            return Some(ResolvedType::Classpath { binary_name: same_package_binary });
        }
        for import in self.imports.iter().filter(|i| i.is_wildcard && !i.is_static) {
            let package = import.path.trim_end_matches(".*").trim_end_matches('.');
            for candidate in ctx.source_classes_in_package(package) {
                if candidate.rsplit(['.', '$']).next() == Some(name) {
                    return Some(ResolvedType::Source { binary_name: candidate });
                }
            }
            let binary_name = qualify(package, name);
            if ctx.classpath().contains(&binary_name) {
                return Some(ResolvedType::Classpath { binary_name });
            }
        }
        let implicit = format!("java.lang.{name}");
        if ctx.classpath().contains(&implicit) {
            return Some(ResolvedType::Classpath { binary_name: implicit });
        }
        None
    }

    fn resolve_in_enclosing_nest(&self, name: &str) -> Option<String> {
        for (depth, class) in self.enclosing.iter().enumerate().rev() {
            if class.name == name {
                return Some(qualify(self.package, &nest_path(&self.enclosing[..=depth])));
            }
            if let Some(found) = resolve_in_classes(&class.nested, name, &self.enclosing[..=depth]) {
                return Some(qualify(self.package, &found));
            }
        }
        None
    }
}

fn classify(ctx: &dyn ResolveContext, binary_name: &str) -> Option<ResolvedType> {
    if ctx.classpath().contains(binary_name) {
        return Some(ResolvedType::Classpath { binary_name: binary_name.to_string() });
    }
    let package = binary_name.rfind('.').map(|i| &binary_name[..i]).unwrap_or("");
    if ctx.source_classes_in_package(package).iter().any(|c| c == binary_name) {
        return Some(ResolvedType::Source { binary_name: binary_name.to_string() });
    }
    None
}

fn qualify(package: &str, nest_or_name: &str) -> String {
    if package.is_empty() {
        nest_or_name.to_string()
    } else {
        format!("{package}.{nest_or_name}")
    }
}

fn nest_path(chain: &[&ClassItem]) -> String {
    chain.iter().map(|c| c.name.as_str()).collect::<Vec<_>>().join("$")
}

fn resolve_in_classes(classes: &[ClassItem], name: &str, prefix: &[&ClassItem]) -> Option<String> {
    for class in classes {
        if class.name == name {
            let mut path: Vec<&str> = prefix.iter().map(|c| c.name.as_str()).collect();
            path.push(&class.name);
            return Some(path.join("$"));
        }
    }
    None
}

fn find_enclosing<'a>(classes: &'a [ClassItem], offset: jls_core::TextSize, out: &mut Vec<&'a ClassItem>) {
    for class in classes {
        if class.range.contains(offset) || class.range.end() == offset {
            out.push(class);
            find_enclosing(&class.nested, offset, out);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jls_classpath::{Classpath, JdkIndex, Universe};

    struct FakeContext {
        universe: Universe,
        source_packages: std::collections::HashMap<String, Vec<String>>,
    }

    impl ResolveContext for FakeContext {
        fn classpath(&self) -> &Universe {
            &self.universe
        }
        fn source_classes_in_package(&self, package: &str) -> Vec<String> {
            self.source_packages.get(package).cloned().unwrap_or_default()
        }
    }

    fn empty_universe() -> Universe {
        Universe::new(JdkIndex::empty(), &Classpath::default(), None)
    }

    #[test]
    fn resolves_nested_class_of_enclosing_type() {
        let tree = jls_hir::lower_item_tree("package p;\nclass Outer {\n  class Inner {}\n  void m() { Inner x; }\n}\n");
        let offset = tree.classes[0].methods[0].body.unwrap().start() + jls_core::TextSize::from(5);
        let scope = Scope::at_offset(&tree, offset);
        let ctx = FakeContext { universe: empty_universe(), source_packages: Default::default() };
        let resolved = scope.resolve_simple_name("Inner", &ctx).unwrap();
        assert_eq!(resolved.binary_name(), "p.Outer$Inner");
    }

    #[test]
    fn resolves_sibling_top_level_class_in_same_file() {
        let tree = jls_hir::lower_item_tree("package p;\nclass A {}\nclass B {}\n");
        let scope = Scope::at_offset(&tree, jls_core::TextSize::from(0));
        let ctx = FakeContext { universe: empty_universe(), source_packages: Default::default() };
        assert_eq!(scope.resolve_simple_name("B", &ctx).unwrap().binary_name(), "p.B");
    }

    #[test]
    fn unresolved_name_returns_none() {
        let tree = jls_hir::lower_item_tree("package p;\nclass A {}\n");
        let scope = Scope::at_offset(&tree, jls_core::TextSize::from(0));
        let ctx = FakeContext { universe: empty_universe(), source_packages: Default::default() };
        assert!(scope.resolve_simple_name("Nonexistent", &ctx).is_none());
    }

    #[test]
    fn wildcard_import_checks_source_and_classpath_packages() {
        let tree = jls_hir::lower_item_tree("package p;\nimport q.*;\nclass A {}\n");
        let scope = Scope::at_offset(&tree, jls_core::TextSize::from(0));
        let mut source_packages = std::collections::HashMap::new();
        source_packages.insert("q".to_string(), vec!["q.Widget".to_string()]);
        let ctx = FakeContext { universe: empty_universe(), source_packages };
        assert_eq!(scope.resolve_simple_name("Widget", &ctx).unwrap().binary_name(), "q.Widget");
    }
}
