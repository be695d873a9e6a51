//! Stable, strongly-typed identifiers threaded through the workspace.

use crate::name::Name;
use std::fmt;

/// Identifies a tracked source file. Assigned by the file store the first
/// time a path is observed and stable for the lifetime of the process.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct FileId(pub u32);

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0)
    }
}

/// Identifies one resolved class/interface/enum/record/annotation type,
/// scoped to a single compiler façade session (it is not stable across
/// classpath changes — spec.md explicitly excludes a persistent semantic
/// database surviving across different classpaths).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub u32);

/// A dotted package name, e.g. `com.example.util`. The empty package is a
/// valid (and common) value for default-package sources.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
pub struct PackageName(Name);

impl PackageName {
    pub fn new(text: impl Into<Name>) -> Self {
        Self(text.into())
    }

    pub fn empty() -> Self {
        Self(Name::new(""))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.0.as_str().is_empty()
    }

    /// The directory components a package name implies relative to a source
    /// root, e.g. `com.example` -> `["com", "example"]`.
    pub fn path_components(&self) -> impl Iterator<Item = &str> {
        self.as_str().split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully qualified type name, e.g. `com.example.util.Widget` or (nested)
/// `com.example.util.Widget.Builder`.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(Name);

impl QualifiedName {
    pub fn new(text: impl Into<Name>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The simple (unqualified) name, i.e. the last dotted segment.
    pub fn simple_name(&self) -> &str {
        self.as_str().rsplit('.').next().unwrap_or(self.as_str())
    }

    /// The package portion, i.e. everything before the last *uppercase*
    /// top-level segment. This is a best-effort split used only for display
    /// and candidate filtering, never for semantic decisions.
    pub fn package(&self) -> PackageName {
        match self.as_str().rsplit_once('.') {
            Some((pkg, _)) => PackageName::new(pkg),
            None => PackageName::empty(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A simple (unqualified) type name used when resolving import statements
/// and completion candidates.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct TypeName(Name);

impl TypeName {
    pub fn new(text: impl Into<Name>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_splits_simple_and_package() {
        let q = QualifiedName::new("com.example.util.Widget");
        assert_eq!(q.simple_name(), "Widget");
        assert_eq!(q.package().as_str(), "com.example.util");
    }

    #[test]
    fn qualified_name_without_package() {
        let q = QualifiedName::new("Widget");
        assert_eq!(q.simple_name(), "Widget");
        assert!(q.package().is_empty());
    }

    #[test]
    fn package_path_components() {
        let pkg = PackageName::new("com.example");
        assert_eq!(pkg.path_components().collect::<Vec<_>>(), vec!["com", "example"]);
        assert!(PackageName::empty().path_components().next().is_none());
    }
}
