//! Resolves the on-disk cache root for a workspace (spec.md §6 "Persistent
//! state layout"): `$XDG_CACHE_HOME/jls/<workspace-basename>-<hash>`, falling
//! back to `$HOME/.cache/jls/<...>` when `XDG_CACHE_HOME` is unset.

use crate::Fingerprint;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheDirError {
    #[error("could not determine a home directory (checked $HOME)")]
    MissingHomeDir,
    #[error("failed to canonicalize workspace root {path}: {source}")]
    Canonicalize { path: PathBuf, source: std::io::Error },
    #[error("failed to create cache directory {path}: {source}")]
    CreateDir { path: PathBuf, source: std::io::Error },
}

/// Returns (creating if necessary) the cache root for `workspace_root`.
///
/// `override_dir` corresponds to the `cache.dir` configuration key
/// (spec.md §6): when set, it is used verbatim as the cache root for this
/// workspace (no basename/hash subdirectory is appended, since the override
/// is already workspace-specific by construction). When unset, the root is
/// derived from `$XDG_CACHE_HOME` or `$HOME/.cache`, namespaced under `jls/`
/// and keyed by `<workspace-basename>-<8 hex chars of the root's fingerprint>`
/// so two differently-located workspaces that happen to share a basename
/// (e.g. two checkouts both named `app`) never collide.
pub fn cache_root_for_workspace(workspace_root: &Path, override_dir: Option<&Path>) -> Result<PathBuf, CacheDirError> {
    if let Some(dir) = override_dir {
        std::fs::create_dir_all(dir).map_err(|source| CacheDirError::CreateDir { path: dir.to_path_buf(), source })?;
        return Ok(dir.to_path_buf());
    }

    let canonical = std::fs::canonicalize(workspace_root)
        .map_err(|source| CacheDirError::Canonicalize { path: workspace_root.to_path_buf(), source })?;

    let basename = canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workspace".to_string());

    let hash = Fingerprint::from_bytes(canonical.to_string_lossy().as_bytes());
    let short_hash = &hash.as_str()[..8];

    let root = xdg_cache_home()?.join("jls").join(format!("{basename}-{short_hash}"));
    std::fs::create_dir_all(&root).map_err(|source| CacheDirError::CreateDir { path: root.clone(), source })?;
    Ok(root)
}

fn xdg_cache_home() -> Result<PathBuf, CacheDirError> {
    if let Some(dir) = std::env::var_os("XDG_CACHE_HOME") {
        let dir = PathBuf::from(dir);
        if dir.is_absolute() {
            return Ok(dir);
        }
    }

    let home = std::env::var_os("HOME").map(PathBuf::from).ok_or(CacheDirError::MissingHomeDir)?;
    Ok(home.join(".cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_dir_is_used_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let override_dir = tmp.path().join("custom-cache");
        let root = cache_root_for_workspace(tmp.path(), Some(&override_dir)).unwrap();
        assert_eq!(root, override_dir);
        assert!(root.exists());
    }

    #[test]
    fn distinct_workspaces_with_same_basename_do_not_collide() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a").join("app");
        let b = tmp.path().join("b").join("app");
        std::fs::create_dir_all(&a).unwrap();
        std::fs::create_dir_all(&b).unwrap();

        // SAFETY: test-only env mutation, no concurrent access to this var in this process.
        unsafe { std::env::set_var("XDG_CACHE_HOME", tmp.path().join("xdg")) };
        let root_a = cache_root_for_workspace(&a, None).unwrap();
        let root_b = cache_root_for_workspace(&b, None).unwrap();
        unsafe { std::env::remove_var("XDG_CACHE_HOME") };

        assert_ne!(root_a, root_b);
    }

    #[test]
    fn same_workspace_resolves_deterministically() {
        let tmp = tempfile::tempdir().unwrap();
        unsafe { std::env::set_var("XDG_CACHE_HOME", tmp.path().join("xdg")) };
        let first = cache_root_for_workspace(tmp.path(), None).unwrap();
        let second = cache_root_for_workspace(tmp.path(), None).unwrap();
        unsafe { std::env::remove_var("XDG_CACHE_HOME") };
        assert_eq!(first, second);
    }
}
