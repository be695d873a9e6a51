//! `URLClassLoader`-style enumeration of the public top-level classes a
//! classpath jar provides, with the same fingerprint-gated disk cache as the
//! JDK module index.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use jls_cache::Fingerprint;
use serde::{Deserialize, Serialize};

use crate::archive::{class_internal_names, open_zip, ArchiveError};

#[derive(Debug, thiserror::Error)]
pub enum JarIndexError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedJarIndex {
    classes: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct JarIndex {
    pub jar: PathBuf,
    /// Binary names (`com.example.Widget`) of every top-level class the jar
    /// provides.
    pub classes: BTreeSet<String>,
}

impl JarIndex {
    pub fn scan(jar: impl Into<PathBuf>) -> Result<Self, JarIndexError> {
        Self::scan_with_cache(jar, None)
    }

    pub fn scan_with_cache(jar: impl Into<PathBuf>, cache_dir: Option<&Path>) -> Result<Self, JarIndexError> {
        let jar = jar.into();
        let fingerprint = Fingerprint::from_file(&jar).unwrap_or_else(|_| Fingerprint::from_bytes(jar.to_string_lossy().as_bytes()));

        let cache_path = cache_dir.map(|dir| dir.join(cache_file_name(&jar)));
        if let Some(path) = &cache_path {
            if let Some(cached) = jls_cache::read_if_fresh::<CachedJarIndex>(path, &fingerprint) {
                return Ok(Self { jar, classes: cached.classes.into_iter().collect() });
            }
        }

        let mut archive = open_zip(&jar)?;
        let classes: BTreeSet<String> = class_internal_names(&mut archive, "")
            .into_iter()
            .filter(|name| !name.contains('$'))
            .map(|name| name.replace('/', "."))
            .collect();

        if let Some(path) = &cache_path {
            let cached = CachedJarIndex { classes: classes.iter().cloned().collect() };
            let _ = jls_cache::write_atomic_json(path, &fingerprint, &cached);
        }

        Ok(Self { jar, classes })
    }
}

fn cache_file_name(jar: &Path) -> String {
    let stem = jar.file_stem().and_then(|s| s.to_str()).unwrap_or("jar");
    let hash = Fingerprint::from_bytes(jar.to_string_lossy().as_bytes());
    format!("{stem}-{}.idx", &hash.as_str()[..16])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::test_support::write_zip;
    use tempfile::tempdir;

    #[test]
    fn scans_top_level_classes_and_skips_nested() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_zip(
            &jar,
            &[
                ("com/example/Widget.class", b""),
                ("com/example/Widget$Builder.class", b""),
                ("META-INF/MANIFEST.MF", b""),
            ],
        );

        let index = JarIndex::scan(&jar).unwrap();
        assert_eq!(index.classes, BTreeSet::from(["com.example.Widget".to_string()]));
    }

    #[test]
    fn reuses_cache_on_unchanged_jar() {
        let dir = tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_zip(&jar, &[("com/example/Widget.class", b"")]);
        let cache_dir = tempdir().unwrap();

        let first = JarIndex::scan_with_cache(&jar, Some(cache_dir.path())).unwrap();
        assert_eq!(first.classes.len(), 1);

        // Rewriting the jar changes its fingerprint, which must force a live
        // re-scan rather than serving the stale cache entry.
        std::fs::write(&jar, b"not a zip").unwrap();
        let second = JarIndex::scan_with_cache(&jar, Some(cache_dir.path()));
        assert!(second.is_err(), "fingerprint miss should trigger a real re-scan, which fails on invalid zip bytes");
    }
}
