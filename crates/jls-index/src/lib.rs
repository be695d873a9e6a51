//! Lexical token index (spec.md §4.2): a cheap, purely-lexical candidate
//! filter used ahead of real compilation for find-references and
//! type-reference search. Tokenization is intentionally dumb — comments and
//! string literals are indexed too — because the index only needs to be a
//! superset of the true answer; the compiler narrows it down afterward.

use jls_cache::Fingerprint;
use jls_core::AbsPathBuf;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: std::io::Error },
}

#[derive(Default)]
struct IndexState {
    token_to_files: HashMap<String, HashSet<PathBuf>>,
    file_to_tokens: HashMap<PathBuf, HashSet<String>>,
    file_mtimes: HashMap<PathBuf, SystemTime>,
}

impl IndexState {
    fn remove_file_locked(&mut self, path: &Path) {
        if let Some(tokens) = self.file_to_tokens.remove(path) {
            for token in tokens {
                if let Some(files) = self.token_to_files.get_mut(&token) {
                    files.remove(path);
                    if files.is_empty() {
                        self.token_to_files.remove(&token);
                    }
                }
            }
        }
        self.file_mtimes.remove(path);
    }

    fn insert_file_locked(&mut self, path: PathBuf, mtime: SystemTime, tokens: HashSet<String>) {
        for token in &tokens {
            self.token_to_files.entry(token.clone()).or_default().insert(path.clone());
        }
        self.file_to_tokens.insert(path.clone(), tokens);
        self.file_mtimes.insert(path, mtime);
    }
}

/// A lock-protected dual index: token -> files, file -> tokens. Readers and
/// writers share one lock; hot-path lookups acquire it only long enough to
/// clone the result set, per spec.md §4.2.
pub struct TokenIndex {
    state: RwLock<IndexState>,
}

impl Default for TokenIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenIndex {
    pub fn new() -> Self {
        Self { state: RwLock::new(IndexState::default()) }
    }

    /// Reindexes `path` if its on-disk modification time has advanced past
    /// the last indexed value (or the file is new). Returns `true` if the
    /// file was (re)indexed, `false` if the cached entry was already fresh.
    pub fn update_file(&self, path: &Path) -> Result<bool, IndexError> {
        let metadata = std::fs::metadata(path).map_err(|source| IndexError::Read { path: path.to_path_buf(), source })?;
        let mtime = metadata.modified().map_err(|source| IndexError::Read { path: path.to_path_buf(), source })?;

        {
            let state = self.state.read();
            if let Some(&cached) = state.file_mtimes.get(path) {
                if cached >= mtime {
                    return Ok(false);
                }
            }
        }

        let text = std::fs::read_to_string(path).map_err(|source| IndexError::Read { path: path.to_path_buf(), source })?;
        let tokens: HashSet<String> = jls_core::lex_identifiers(&text).into_iter().map(str::to_string).collect();

        let mut state = self.state.write();
        state.remove_file_locked(path);
        state.insert_file_locked(path.to_path_buf(), mtime, tokens);
        Ok(true)
    }

    pub fn remove_file(&self, path: &Path) {
        self.state.write().remove_file_locked(path);
    }

    pub fn files_containing(&self, token: &str) -> BTreeSet<PathBuf> {
        let state = self.state.read();
        state.token_to_files.get(token).into_iter().flatten().cloned().collect()
    }

    pub fn files_containing_any<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> BTreeSet<PathBuf> {
        let state = self.state.read();
        let mut out = BTreeSet::new();
        for token in tokens {
            if let Some(files) = state.token_to_files.get(token) {
                out.extend(files.iter().cloned());
            }
        }
        out
    }

    pub fn is_indexed(&self, path: &Path) -> bool {
        self.state.read().file_mtimes.contains_key(path)
    }

    pub fn indexed_file_count(&self) -> usize {
        self.state.read().file_mtimes.len()
    }

    /// Loads previously persisted entries, keeping only those whose file
    /// still exists, lies under one of `roots`, and whose disk mtime still
    /// matches the cached value (spec.md §4.2).
    pub fn load_cache(&self, roots: &[AbsPathBuf], entries: Vec<CachedTokenEntry>) {
        let mut state = self.state.write();
        for entry in entries {
            if !roots.iter().any(|root| entry.path.starts_with(root.as_path())) {
                continue;
            }
            let Ok(metadata) = std::fs::metadata(&entry.path) else { continue };
            let Ok(mtime) = metadata.modified() else { continue };
            if epoch_millis(mtime) != entry.modified_epoch_millis {
                continue;
            }
            state.insert_file_locked(entry.path, mtime, entry.tokens.into_iter().collect());
        }
    }

    pub fn to_cache_entries(&self) -> Vec<CachedTokenEntry> {
        let state = self.state.read();
        state
            .file_to_tokens
            .iter()
            .map(|(path, tokens)| CachedTokenEntry {
                path: path.clone(),
                modified_epoch_millis: state.file_mtimes.get(path).copied().map(epoch_millis).unwrap_or(0),
                tokens: tokens.iter().cloned().collect(),
            })
            .collect()
    }

    pub fn save_cache(&self, path: &Path) -> Result<(), jls_cache::CacheError> {
        let entries = self.to_cache_entries();
        jls_cache::write_atomic_json(path, &cache_schema_fingerprint(), &entries)
    }

    pub fn load_cache_from_disk(&self, path: &Path, roots: &[AbsPathBuf]) {
        let entries: Option<Vec<CachedTokenEntry>> = jls_cache::read_if_fresh(path, &cache_schema_fingerprint());
        if let Some(entries) = entries {
            self.load_cache(roots, entries);
        }
    }
}

fn cache_schema_fingerprint() -> Fingerprint {
    Fingerprint::from_bytes(b"jls-index-v1")
}

fn epoch_millis(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTokenEntry {
    pub path: PathBuf,
    #[serde(rename = "modifiedEpochMillis")]
    pub modified_epoch_millis: u64,
    pub tokens: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn indexes_identifiers_and_finds_by_token() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "A.java", "package p; class Foo { Bar field; }");
        let index = TokenIndex::new();
        assert!(index.update_file(&path).unwrap());
        assert_eq!(index.files_containing("Bar"), BTreeSet::from([path.clone()]));
        assert!(index.files_containing("Nonexistent").is_empty());
    }

    #[test]
    fn files_containing_any_is_the_union() {
        let tmp = tempfile::tempdir().unwrap();
        let a = write(tmp.path(), "A.java", "class A { X x; }");
        let b = write(tmp.path(), "B.java", "class B { Y y; }");
        let index = TokenIndex::new();
        index.update_file(&a).unwrap();
        index.update_file(&b).unwrap();
        assert_eq!(index.files_containing_any(["X", "Y"]), BTreeSet::from([a, b]));
    }

    #[test]
    fn unchanged_mtime_skips_reindex() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "A.java", "class A { X x; }");
        let index = TokenIndex::new();
        assert!(index.update_file(&path).unwrap());
        assert!(!index.update_file(&path).unwrap());
    }

    #[test]
    fn remove_file_drops_its_tokens() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write(tmp.path(), "A.java", "class A { Unique x; }");
        let index = TokenIndex::new();
        index.update_file(&path).unwrap();
        assert!(!index.files_containing("Unique").is_empty());
        index.remove_file(&path);
        assert!(index.files_containing("Unique").is_empty());
    }

    #[test]
    fn load_cache_rejects_entries_outside_roots_or_with_stale_mtime() {
        let tmp = tempfile::tempdir().unwrap();
        let root = AbsPathBuf::canonicalize(tmp.path()).unwrap();
        let path = write(tmp.path(), "A.java", "class A { Keep x; }");
        let real_mtime = epoch_millis(std::fs::metadata(&path).unwrap().modified().unwrap());

        let index = TokenIndex::new();
        let stale = CachedTokenEntry { path: path.clone(), modified_epoch_millis: real_mtime + 1, tokens: vec!["Keep".into()] };
        let outside = CachedTokenEntry { path: PathBuf::from("/not/a/root/B.java"), modified_epoch_millis: 0, tokens: vec!["Drop".into()] };
        index.load_cache(&[root.clone()], vec![stale, outside]);
        assert!(index.files_containing("Keep").is_empty());
        assert!(index.files_containing("Drop").is_empty());

        let fresh = CachedTokenEntry { path: path.clone(), modified_epoch_millis: real_mtime, tokens: vec!["Keep".into()] };
        index.load_cache(&[root], vec![fresh]);
        assert!(!index.files_containing("Keep").is_empty());
    }

    #[test]
    fn save_and_load_cache_from_disk_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let root = AbsPathBuf::canonicalize(tmp.path()).unwrap();
        let path = write(tmp.path(), "A.java", "class A { Thing x; }");
        let index = TokenIndex::new();
        index.update_file(&path).unwrap();

        let cache_file = tmp.path().join("index-cache.json");
        index.save_cache(&cache_file).unwrap();

        let reloaded = TokenIndex::new();
        reloaded.load_cache_from_disk(&cache_file, &[root]);
        assert!(!reloaded.files_containing("Thing").is_empty());
    }
}
