//! The type handle every semantic query (spec.md §4.3) eventually resolves
//! to: either a class declared in a source file on this workspace, or a
//! binary type found on the classpath/JDK.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResolvedType {
    /// A type declared in a workspace source file, identified by its binary
    /// name (`com.example.Outer$Inner`).
    Source { binary_name: String },
    /// A type found on the JDK or a classpath jar.
    Classpath { binary_name: String },
}

impl ResolvedType {
    pub fn binary_name(&self) -> &str {
        match self {
            ResolvedType::Source { binary_name } | ResolvedType::Classpath { binary_name } => binary_name,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.binary_name().rsplit(['.', '$']).next().unwrap_or(self.binary_name())
    }

    pub fn package(&self) -> &str {
        match self.binary_name().rfind('.') {
            Some(idx) if !self.binary_name()[..idx].contains('$') => &self.binary_name()[..idx],
            _ => match self.binary_name().split('$').next() {
                Some(outer) => outer.rfind('.').map(|i| &outer[..i]).unwrap_or(""),
                None => "",
            },
        }
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.binary_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_of_top_level_type() {
        let t = ResolvedType::Source { binary_name: "com.example.Widget".into() };
        assert_eq!(t.package(), "com.example");
        assert_eq!(t.simple_name(), "Widget");
    }

    #[test]
    fn package_of_default_package_type() {
        let t = ResolvedType::Source { binary_name: "Widget".into() };
        assert_eq!(t.package(), "");
    }
}
