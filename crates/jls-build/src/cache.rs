//! Fingerprint-gated cache for build-tool classpath/docpath inference
//! (spec.md §4.4): keyed on the build file's contents, the external
//! dependency coordinates named in it, the goal invoked, and any extra CLI
//! arguments, so a cache hit never serves a stale classpath after the
//! project's dependencies or build tool invocation change.

use std::path::{Path, PathBuf};

use jls_cache::Fingerprint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CachedBuildResult {
    pub classpath: Vec<PathBuf>,
    pub docpath: Vec<PathBuf>,
}

pub struct BuildCache<'a> {
    cache_dir: Option<&'a Path>,
}

impl<'a> BuildCache<'a> {
    pub fn new(cache_dir: Option<&'a Path>) -> Self {
        Self { cache_dir }
    }

    pub fn key(build_file: &Path, external_deps: &[String], goal: &str, extra_args: &[String]) -> Fingerprint {
        let build_fp = Fingerprint::from_file(build_file).unwrap_or_else(|_| Fingerprint::from_bytes(build_file.to_string_lossy().as_bytes()));
        let deps_fp = Fingerprint::from_bytes(external_deps.join("\n"));
        let goal_fp = Fingerprint::from_bytes(goal);
        let args_fp = Fingerprint::from_bytes(extra_args.join("\n"));
        Fingerprint::combine([&build_fp, &deps_fp, &goal_fp, &args_fp])
    }

    pub fn get(&self, build_file: &Path, fingerprint: &Fingerprint) -> Option<CachedBuildResult> {
        let path = self.path_for(build_file)?;
        jls_cache::read_if_fresh(&path, fingerprint)
    }

    pub fn put(&self, build_file: &Path, fingerprint: &Fingerprint, result: &CachedBuildResult) {
        if let Some(path) = self.path_for(build_file) {
            let _ = jls_cache::write_atomic_json(&path, fingerprint, result);
        }
    }

    fn path_for(&self, build_file: &Path) -> Option<PathBuf> {
        let dir = self.cache_dir?;
        let stem = build_file.file_name().and_then(|s| s.to_str()).unwrap_or("build");
        let hash = Fingerprint::from_bytes(build_file.to_string_lossy().as_bytes());
        Some(dir.join(format!("{stem}-{}.idx", &hash.as_str()[..16])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn round_trips_through_cache() {
        let dir = tempdir().unwrap();
        let build_file = dir.path().join("pom.xml");
        std::fs::write(&build_file, b"<project/>").unwrap();
        let cache_dir = tempdir().unwrap();
        let cache = BuildCache::new(Some(cache_dir.path()));

        let key = BuildCache::key(&build_file, &["a:b:1.0".into()], "classpath", &[]);
        assert!(cache.get(&build_file, &key).is_none());

        let result = CachedBuildResult { classpath: vec![PathBuf::from("a.jar")], docpath: vec![] };
        cache.put(&build_file, &key, &result);
        assert_eq!(cache.get(&build_file, &key), Some(result));
    }

    #[test]
    fn key_changes_when_dependency_list_changes() {
        let dir = tempdir().unwrap();
        let build_file = dir.path().join("pom.xml");
        std::fs::write(&build_file, b"<project/>").unwrap();

        let a = BuildCache::key(&build_file, &["a:b:1.0".into()], "classpath", &[]);
        let b = BuildCache::key(&build_file, &["a:b:2.0".into()], "classpath", &[]);
        assert_ne!(a, b);
    }
}
