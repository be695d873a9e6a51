//! An ordered list of classpath entries (jars and `.class` output
//! directories) plus the combined name universe it and the JDK provide —
//! what the resolver consults to answer "does this simple name exist
//! somewhere on the classpath" before falling back to an unresolved symbol.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::jar_index::JarIndex;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classpath {
    pub entries: Vec<PathBuf>,
}

impl Classpath {
    pub fn new(entries: Vec<PathBuf>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The combined set of binary class names visible from the JDK plus every
/// classpath jar, used for cheap "does this name exist" membership checks
/// without opening every archive on each query.
pub struct Universe {
    jdk: crate::jdk_index::JdkIndex,
    jar_indices: Vec<JarIndex>,
}

impl Universe {
    pub fn new(jdk: crate::jdk_index::JdkIndex, classpath: &Classpath, cache_dir: Option<&Path>) -> Self {
        let jar_indices = classpath
            .entries
            .iter()
            .filter(|p| p.extension().and_then(|e| e.to_str()) == Some("jar"))
            .filter_map(|jar| JarIndex::scan_with_cache(jar, cache_dir).ok())
            .collect();
        Self { jdk, jar_indices }
    }

    pub fn contains(&self, binary_name: &str) -> bool {
        self.jdk.contains_type(binary_name) || self.jar_indices.iter().any(|idx| idx.classes.contains(binary_name))
    }

    pub fn class_names_with_prefix(&self, prefix: &str) -> BTreeSet<String> {
        let mut names: BTreeSet<String> = self.jdk.class_names_with_prefix(prefix).into_iter().collect();
        for idx in &self.jar_indices {
            names.extend(idx.classes.iter().filter(|c| c.starts_with(prefix)).cloned());
        }
        names
    }

    pub fn jdk(&self) -> &crate::jdk_index::JdkIndex {
        &self.jdk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_classpath_is_empty() {
        assert!(Classpath::default().is_empty());
        assert!(!Classpath::new(vec![PathBuf::from("a.jar")]).is_empty());
    }
}
