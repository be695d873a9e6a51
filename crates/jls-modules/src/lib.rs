//! JPMS (`module-info.java`/`module-info.class`) module descriptors, shared
//! between `jls-classfile` (which decodes them off disk) and `jls-classpath`
//! (which indexes them into the JDK module graph).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleName(String);

impl ModuleName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    /// Declares a real `module-info.class`.
    Explicit,
    /// Inferred from an unnamed/automatic classpath jar (its module name is
    /// derived from the jar's filename per JPMS automatic-module rules).
    Automatic,
    /// The classpath's catch-all unnamed module.
    Unnamed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requires {
    pub module: ModuleName,
    pub is_transitive: bool,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exports {
    pub package: String,
    /// Empty means exported to all modules.
    pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opens {
    pub package: String,
    pub to: Vec<ModuleName>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Uses {
    pub service: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provides {
    pub service: String,
    pub implementations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInfo {
    pub kind: ModuleKind,
    pub name: ModuleName,
    pub is_open: bool,
    pub requires: Vec<Requires>,
    pub exports: Vec<Exports>,
    pub opens: Vec<Opens>,
    pub uses: Vec<Uses>,
    pub provides: Vec<Provides>,
}

impl ModuleInfo {
    pub fn unnamed() -> Self {
        ModuleInfo {
            kind: ModuleKind::Unnamed,
            name: ModuleName::new("ALL-UNNAMED"),
            is_open: true,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
        }
    }

    /// Whether `package` is visible to `reader` per this module's `exports`
    /// (unconditional, or qualified to `reader` by name).
    pub fn exports_to(&self, package: &str, reader: &ModuleName) -> bool {
        self.exports.iter().any(|e| e.package == package && (e.to.is_empty() || e.to.contains(reader)))
    }
}

/// The set of modules reachable from a root set by transitive `requires`,
/// used to resolve `--add-modules`/default-root-module compilation scope.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    modules: BTreeMap<ModuleName, ModuleInfo>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModuleGraphError {
    #[error("unknown module `{0}`")]
    UnknownModule(ModuleName),
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, info: ModuleInfo) {
        self.modules.insert(info.name.clone(), info);
    }

    pub fn get(&self, name: &ModuleName) -> Option<&ModuleInfo> {
        self.modules.get(name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &ModuleName> {
        self.modules.keys()
    }

    /// Transitive closure of `requires` starting from `roots`, following
    /// `requires transitive` edges only one hop further than direct
    /// `requires` — i.e. the standard JPMS readability relation.
    pub fn readable_closure(&self, roots: &[ModuleName]) -> Result<Vec<ModuleName>, ModuleGraphError> {
        let mut seen = std::collections::BTreeSet::new();
        let mut stack: Vec<ModuleName> = roots.to_vec();
        while let Some(name) = stack.pop() {
            if !seen.insert(name.clone()) {
                continue;
            }
            let info = self.get(&name).ok_or_else(|| ModuleGraphError::UnknownModule(name.clone()))?;
            for req in &info.requires {
                stack.push(req.module.clone());
            }
        }
        Ok(seen.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str, requires: &[&str]) -> ModuleInfo {
        ModuleInfo {
            kind: ModuleKind::Explicit,
            name: ModuleName::new(name),
            is_open: false,
            requires: requires
                .iter()
                .map(|r| Requires { module: ModuleName::new(*r), is_transitive: false, is_static: false })
                .collect(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
        }
    }

    #[test]
    fn readable_closure_follows_requires_transitively() {
        let mut graph = ModuleGraph::new();
        graph.insert(module("app", &["lib.a"]));
        graph.insert(module("lib.a", &["lib.b"]));
        graph.insert(module("lib.b", &[]));

        let closure = graph.readable_closure(&[ModuleName::new("app")]).unwrap();
        assert_eq!(closure.len(), 3);
        assert!(closure.contains(&ModuleName::new("lib.b")));
    }

    #[test]
    fn unknown_root_module_is_an_error() {
        let graph = ModuleGraph::new();
        let err = graph.readable_closure(&[ModuleName::new("missing")]).unwrap_err();
        assert!(matches!(err, ModuleGraphError::UnknownModule(_)));
    }

    #[test]
    fn exports_to_respects_qualified_exports() {
        let mut info = module("lib", &[]);
        info.exports.push(Exports { package: "lib.internal".into(), to: vec![ModuleName::new("friend")] });
        assert!(info.exports_to("lib.internal", &ModuleName::new("friend")));
        assert!(!info.exports_to("lib.internal", &ModuleName::new("stranger")));
    }
}
