//! `java-sources.json` persistence (spec.md §6 persistent-state layout).

use jls_core::PackageName;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("failed to read cache file {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("failed to write cache file {path}: {source}")]
    Write { path: PathBuf, source: std::io::Error },
    #[error("failed to parse cache file {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedFileRecord {
    path: PathBuf,
    #[serde(rename = "modifiedEpochMillis")]
    modified_epoch_millis: u64,
    #[serde(rename = "packageName")]
    package_name: String,
}

#[derive(Debug, Clone)]
pub struct CachedFile {
    pub path: PathBuf,
    pub modified_epoch_millis: u64,
    pub package_name: PackageName,
}

pub fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

/// Thin wrapper around the `java-sources.json` cache file: an array of
/// `{path, modifiedEpochMillis, packageName}` records (spec.md §4.1).
pub struct FileStoreCache {
    path: PathBuf,
}

impl FileStoreCache {
    pub fn new(cache_file_path: PathBuf) -> Self {
        Self { path: cache_file_path }
    }

    pub fn load(&self) -> Result<Vec<CachedFile>, CacheError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| CacheError::Read { path: self.path.clone(), source })?;
        let records: Vec<CachedFileRecord> = serde_json::from_str(&text)
            .map_err(|source| CacheError::Json { path: self.path.clone(), source })?;
        Ok(records
            .into_iter()
            .map(|r| CachedFile {
                path: r.path,
                modified_epoch_millis: r.modified_epoch_millis,
                package_name: PackageName::new(r.package_name),
            })
            .collect())
    }

    /// Writes the cache atomically (write-temp-then-rename), so a crash
    /// mid-write never leaves a partially-written cache file behind.
    pub fn save(&self, entries: &[CachedFile]) -> Result<(), CacheError> {
        let records: Vec<CachedFileRecord> = entries
            .iter()
            .map(|e| CachedFileRecord {
                path: e.path.clone(),
                modified_epoch_millis: e.modified_epoch_millis,
                package_name: e.package_name.as_str().to_string(),
            })
            .collect();

        let json = serde_json::to_vec_pretty(&records)
            .map_err(|source| CacheError::Json { path: self.path.clone(), source })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| CacheError::Write { path: self.path.clone(), source })?;
        }

        write_atomic(&self.path, &json).map_err(|source| CacheError::Write { path: self.path.clone(), source })
    }
}

fn write_atomic(dest: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileStoreCache::new(tmp.path().join("java-sources.json"));
        let entries = vec![CachedFile {
            path: tmp.path().join("A.java"),
            modified_epoch_millis: 123,
            package_name: PackageName::new("com.example"),
        }];
        cache.save(&entries).unwrap();
        let loaded = cache.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].package_name.as_str(), "com.example");
    }

    #[test]
    fn missing_cache_file_loads_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = FileStoreCache::new(tmp.path().join("missing.json"));
        assert!(cache.load().unwrap().is_empty());
    }
}
