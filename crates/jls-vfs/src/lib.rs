//! The workspace file store (spec.md §4.1): tracks every `.java` file under
//! the configured workspace roots, open editor buffers, parsed package
//! names, and a per-workspace on-disk cache.

mod cache;
mod package;

pub use cache::{CacheError, FileStoreCache};

use jls_core::{is_excluded_dir_name, AbsPathBuf, FileId, PackageName, Position};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;
use thiserror::Error;

const MODULE_INFO_FILE_NAME: &str = "module-info.java";

#[derive(Debug, Clone)]
pub enum ChangeEvent {
    /// Full-document replacement.
    Full(String),
    /// A ranged replacement between `(start, end)` LSP positions.
    Ranged { start: Position, end: Position, text: String },
}

#[derive(Debug, Error)]
pub enum ChangeError {
    #[error("file is not open: {0}")]
    NotOpen(PathBuf),
    #[error("change range is not valid for the current document")]
    InvalidRange,
}

#[derive(Debug, Clone)]
struct OpenBuffer {
    content: String,
    version: i32,
}

#[derive(Debug, Clone)]
struct CachedPackage {
    name: PackageName,
    /// Modification time observed when `name` was parsed; invalidated once
    /// `modified` advances past this.
    parsed_at: SystemTime,
}

#[derive(Debug, Clone)]
struct FileEntry {
    path: AbsPathBuf,
    modified: SystemTime,
    open: Option<OpenBuffer>,
    package: Option<CachedPackage>,
}

impl FileEntry {
    fn is_open(&self) -> bool {
        self.open.is_some()
    }

    fn effective_content(&self) -> std::io::Result<String> {
        if let Some(open) = &self.open {
            Ok(open.content.clone())
        } else {
            std::fs::read_to_string(self.path.as_path())
        }
    }
}

/// Narrows [`FileStore::list`] to a subset of source roots, e.g. separating
/// main from test sources. Per spec.md §9 this is a hint, not a correctness
/// requirement: an empty/`None` filter means "all roots".
#[derive(Debug, Clone, Default)]
pub struct SourceRootFilter {
    pub allowed_roots: Vec<PathBuf>,
}

impl SourceRootFilter {
    pub fn allows(&self, path: &Path) -> bool {
        self.allowed_roots.is_empty()
            || self.allowed_roots.iter().any(|root| path.starts_with(root))
    }
}

pub struct FileStore {
    roots: Vec<AbsPathBuf>,
    by_path: HashMap<PathBuf, FileId>,
    files: HashMap<FileId, FileEntry>,
    next_id: u32,
    /// Bumped on every mutation; cross-file caches (spec.md GLOSSARY
    /// "Workspace version") use this as an invalidation token.
    workspace_version: AtomicU64,
}

impl Default for FileStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileStore {
    pub fn new() -> Self {
        Self {
            roots: Vec::new(),
            by_path: HashMap::new(),
            files: HashMap::new(),
            next_id: 0,
            workspace_version: AtomicU64::new(0),
        }
    }

    pub fn workspace_version(&self) -> u64 {
        self.workspace_version.load(Ordering::Acquire)
    }

    fn bump_version(&self) {
        self.workspace_version.fetch_add(1, Ordering::AcqRel);
    }

    /// Normalize and replace the root set, then synchronously walk the
    /// filesystem to (re)populate membership. spec.md describes this walk as
    /// asynchronous; callers that want that should invoke this from a
    /// background task and publish results incrementally — this method is
    /// the synchronous core they drive.
    pub fn set_workspace_roots(&mut self, roots: Vec<AbsPathBuf>) -> std::io::Result<()> {
        self.roots = roots;
        self.files.clear();
        self.by_path.clear();
        self.next_id = 0;

        let roots = self.roots.clone();
        for root in &roots {
            let java_files = jls_core::collect_files_with_extension(root.as_path(), "java")?;
            for path in java_files {
                self.track_file(path)?;
            }
        }
        self.bump_version();
        Ok(())
    }

    pub fn roots(&self) -> &[AbsPathBuf] {
        &self.roots
    }

    fn track_file(&mut self, path: PathBuf) -> std::io::Result<FileId> {
        if let Some(&id) = self.by_path.get(&path) {
            return Ok(id);
        }
        let modified = std::fs::metadata(&path)?.modified()?;
        let id = FileId(self.next_id);
        self.next_id += 1;
        self.by_path.insert(path.clone(), id);
        self.files.insert(
            id,
            FileEntry { path: AbsPathBuf::new(path).map_err(|_| std::io::ErrorKind::InvalidInput)?, modified, open: None, package: None },
        );
        Ok(id)
    }

    pub fn file_id(&self, path: &Path) -> Option<FileId> {
        self.by_path.get(path).copied()
    }

    pub fn path(&self, file: FileId) -> Option<&AbsPathBuf> {
        self.files.get(&file).map(|e| &e.path)
    }

    pub fn is_module_info(&self, file: FileId) -> bool {
        self.path(file)
            .and_then(|p| p.as_path().file_name())
            .is_some_and(|name| name == MODULE_INFO_FILE_NAME)
    }

    pub fn is_open(&self, file: FileId) -> bool {
        self.files.get(&file).is_some_and(FileEntry::is_open)
    }

    pub fn contents(&self, file: FileId) -> std::io::Result<String> {
        let entry = self.files.get(&file).ok_or(std::io::ErrorKind::NotFound)?;
        entry.effective_content()
    }

    pub fn modified(&self, file: FileId) -> Option<SystemTime> {
        self.files.get(&file).map(|e| e.modified)
    }

    /// Opens (or tracks-and-opens) `path` with `text`/`version`, matching
    /// spec.md's "at most one open version per path; version is strictly
    /// monotonic per open session".
    pub fn open(&mut self, path: PathBuf, text: String, version: i32) -> std::io::Result<FileId> {
        let id = match self.by_path.get(&path) {
            Some(&id) => id,
            None => {
                let modified = std::fs::metadata(&path).and_then(|m| m.modified()).unwrap_or(SystemTime::now());
                let id = FileId(self.next_id);
                self.next_id += 1;
                self.by_path.insert(path.clone(), id);
                self.files.insert(
                    id,
                    FileEntry {
                        path: AbsPathBuf::new(path).map_err(|_| std::io::ErrorKind::InvalidInput)?,
                        modified,
                        open: None,
                        package: None,
                    },
                );
                id
            }
        };

        let entry = self.files.get_mut(&id).expect("just inserted");
        entry.open = Some(OpenBuffer { content: text, version });
        entry.package = None;
        self.bump_version();
        Ok(id)
    }

    pub fn change(&mut self, file: FileId, changes: Vec<ChangeEvent>, version: i32) -> Result<(), ChangeError> {
        let entry = self.files.get_mut(&file).ok_or_else(|| ChangeError::NotOpen(PathBuf::new()))?;
        let open = entry.open.as_mut().ok_or_else(|| ChangeError::NotOpen(entry.path.to_path_buf()))?;

        if version <= open.version {
            tracing::warn!(version, current = open.version, "ignoring stale didChange version");
            return Ok(());
        }

        for change in changes {
            match change {
                ChangeEvent::Full(text) => open.content = text,
                ChangeEvent::Ranged { start, end, text } => {
                    let index = jls_core::LineIndex::new(&open.content);
                    let range = jls_core::Range::new(start, end);
                    let byte_range = index
                        .text_range(&open.content, range)
                        .ok_or(ChangeError::InvalidRange)?;
                    let mut new_content = String::with_capacity(open.content.len());
                    new_content.push_str(&open.content[..usize::from(byte_range.start())]);
                    new_content.push_str(&text);
                    new_content.push_str(&open.content[usize::from(byte_range.end())..]);
                    open.content = new_content;
                }
            }
        }
        open.version = version;
        entry.package = None;
        entry.modified = SystemTime::now();
        self.bump_version();
        Ok(())
    }

    pub fn close(&mut self, file: FileId) {
        if let Some(entry) = self.files.get_mut(&file) {
            entry.open = None;
            if let Ok(modified) = std::fs::metadata(entry.path.as_path()).and_then(|m| m.modified()) {
                entry.modified = modified;
            }
            entry.package = None;
        }
        self.bump_version();
    }

    /// Returns the parsed package name, reading from disk and caching
    /// against `modified` on first lookup; stable for an open file until its
    /// buffer is replaced.
    pub fn package_name(&mut self, file: FileId) -> std::io::Result<PackageName> {
        let modified = self.modified(file).unwrap_or(SystemTime::UNIX_EPOCH);
        if let Some(entry) = self.files.get(&file) {
            if let Some(cached) = &entry.package {
                if cached.parsed_at >= modified {
                    return Ok(cached.name.clone());
                }
            }
        }

        let content = self.contents(file)?;
        let name = package::parse_package_name(&content);
        if let Some(entry) = self.files.get_mut(&file) {
            entry.package = Some(CachedPackage { name: name.clone(), parsed_at: modified });
        }
        Ok(name)
    }

    pub fn external_create(&mut self, path: PathBuf) -> std::io::Result<FileId> {
        let id = self.track_file(path)?;
        self.bump_version();
        Ok(id)
    }

    pub fn external_change(&mut self, path: &Path) -> std::io::Result<()> {
        if let Some(&id) = self.by_path.get(path) {
            let modified = std::fs::metadata(path)?.modified()?;
            if let Some(entry) = self.files.get_mut(&id) {
                entry.modified = modified;
                entry.package = None;
            }
            self.bump_version();
        }
        Ok(())
    }

    pub fn external_delete(&mut self, path: &Path) {
        if let Some(id) = self.by_path.remove(path) {
            self.files.remove(&id);
            self.bump_version();
        }
    }

    /// All tracked files whose parsed package name equals `package`,
    /// optionally narrowed by `filter`.
    pub fn list(&mut self, package: &PackageName, filter: Option<&SourceRootFilter>) -> Vec<FileId> {
        let ids: Vec<FileId> = self.files.keys().copied().collect();
        let mut out = Vec::new();
        for id in ids {
            if let Some(filter) = filter {
                if let Some(path) = self.path(id) {
                    if !filter.allows(path.as_path()) {
                        continue;
                    }
                }
            }
            if let Ok(name) = self.package_name(id) {
                if &name == package {
                    out.push(id);
                }
            }
        }
        out.sort();
        out
    }

    pub fn all_files(&self) -> Vec<FileId> {
        let mut ids: Vec<FileId> = self.files.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Derives source root directories by stripping each tracked file's
    /// package-name components off its parent directory.
    pub fn source_roots(&mut self) -> Vec<PathBuf> {
        let ids = self.all_files();
        let mut roots = std::collections::BTreeSet::new();
        for id in ids {
            let Some(path) = self.path(id).cloned() else { continue };
            let Ok(package) = self.package_name(id) else { continue };
            let mut dir = path.as_path().parent().map(Path::to_path_buf);
            for _ in package.path_components() {
                dir = dir.and_then(|d| d.parent().map(Path::to_path_buf));
            }
            if let Some(dir) = dir {
                roots.insert(dir);
            }
        }
        roots.into_iter().collect()
    }

    /// Load a previously persisted cache, keeping only entries whose
    /// recorded mtime matches the file's current on-disk mtime.
    pub fn load_cache(&mut self, entries: Vec<cache::CachedFile>) {
        for entry in entries {
            if !entry.path.starts_with_any(&self.roots) {
                continue;
            }
            let Ok(metadata) = std::fs::metadata(&entry.path) else { continue };
            let Ok(modified) = metadata.modified() else { continue };
            if cache::epoch_millis(modified) != entry.modified_epoch_millis {
                continue;
            }
            let id = match self.by_path.get(&entry.path) {
                Some(&id) => id,
                None => match self.track_file(entry.path.clone()) {
                    Ok(id) => id,
                    Err(_) => continue,
                },
            };
            if let Some(file_entry) = self.files.get_mut(&id) {
                file_entry.package = Some(CachedPackage { name: entry.package_name, parsed_at: modified });
            }
        }
    }

    pub fn to_cache_entries(&self) -> Vec<cache::CachedFile> {
        self.files
            .values()
            .filter_map(|entry| {
                let package = entry.package.as_ref()?;
                Some(cache::CachedFile {
                    path: entry.path.to_path_buf(),
                    modified_epoch_millis: cache::epoch_millis(entry.modified),
                    package_name: package.name.clone(),
                })
            })
            .collect()
    }
}

trait StartsWithAny {
    fn starts_with_any(&self, roots: &[AbsPathBuf]) -> bool;
}

impl StartsWithAny for Path {
    fn starts_with_any(&self, roots: &[AbsPathBuf]) -> bool {
        roots.iter().any(|r| self.starts_with(r.as_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn discovers_java_files_and_excludes_build_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "src/A.java", "package a;\nclass A {}");
        write_file(tmp.path(), "build/Generated.java", "class Generated {}");

        let mut store = FileStore::new();
        let root = AbsPathBuf::canonicalize(tmp.path()).unwrap();
        store.set_workspace_roots(vec![root]).unwrap();

        assert_eq!(store.all_files().len(), 1);
    }

    #[test]
    fn open_then_contents_returns_opened_text() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "A.java", "class A {}");

        let mut store = FileStore::new();
        let id = store.open(path, "class A { int x; }".into(), 1).unwrap();
        assert_eq!(store.contents(id).unwrap(), "class A { int x; }");
    }

    #[test]
    fn open_change_close_restores_disk_contents() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "A.java", "class A {}");

        let mut store = FileStore::new();
        let id = store.open(path, "class A {}".into(), 1).unwrap();
        store
            .change(id, vec![ChangeEvent::Full("class A { int y; }".into())], 2)
            .unwrap();
        assert_eq!(store.contents(id).unwrap(), "class A { int y; }");

        store.close(id);
        assert_eq!(store.contents(id).unwrap(), "class A {}");
    }

    #[test]
    fn stale_change_version_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "A.java", "class A {}");
        let mut store = FileStore::new();
        let id = store.open(path, "v1".into(), 5).unwrap();
        store.change(id, vec![ChangeEvent::Full("v2-should-be-dropped".into())], 3).unwrap();
        assert_eq!(store.contents(id).unwrap(), "v1");
    }

    #[test]
    fn ranged_change_replaces_only_the_given_span() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "A.java", "class A {}");
        let mut store = FileStore::new();
        let id = store.open(path, "hello world".into(), 1).unwrap();
        store
            .change(
                id,
                vec![ChangeEvent::Ranged {
                    start: Position::new(0, 6),
                    end: Position::new(0, 11),
                    text: "rust!".into(),
                }],
                2,
            )
            .unwrap();
        assert_eq!(store.contents(id).unwrap(), "hello rust!");
    }

    #[test]
    fn package_name_is_parsed_and_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "src/com/example/A.java", "package com.example;\nclass A {}");

        let mut store = FileStore::new();
        let root = AbsPathBuf::canonicalize(tmp.path()).unwrap();
        store.set_workspace_roots(vec![root]).unwrap();
        let id = store.all_files()[0];
        assert_eq!(store.package_name(id).unwrap().as_str(), "com.example");
    }

    #[test]
    fn module_info_is_tracked_but_flagged() {
        let tmp = tempfile::tempdir().unwrap();
        write_file(tmp.path(), "module-info.java", "module m {}");
        let mut store = FileStore::new();
        let root = AbsPathBuf::canonicalize(tmp.path()).unwrap();
        store.set_workspace_roots(vec![root]).unwrap();
        let id = store.all_files()[0];
        assert!(store.is_module_info(id));
    }
}
