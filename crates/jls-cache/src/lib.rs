//! Disk-cache plumbing shared by the token index, classpath/JDK scanner, and
//! build-configuration inference (spec.md §3 "Inference Cache", §6
//! persistent-state layout).
//!
//! Every cache in the workspace is: a fingerprint-keyed JSON document,
//! written atomically (write-temp-then-rename so an abnormal exit never
//! leaves a partial file — spec.md §5), with IO/serde failures degrading to
//! "cache missing" rather than propagating.

mod cache_dir;
mod fingerprint;

pub use cache_dir::{cache_root_for_workspace, CacheDirError};
pub use fingerprint::Fingerprint;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
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

/// A fingerprint-keyed JSON cache entry. The fingerprint is stored alongside
/// the payload so a reader can reject a hit whose key no longer matches
/// without needing a second lookup.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Envelope<T> {
    schema_version: u32,
    fingerprint: String,
    payload: T,
}

const SCHEMA_VERSION: u32 = 1;

/// Read a cached `T` from `path`, returning `None` on any miss: missing
/// file, fingerprint mismatch, unreadable/malformed JSON, or a schema
/// version bump. Every miss is logged at `debug` (not `warn`) since a miss
/// is the expected steady-state outcome of changing code/config.
pub fn read_if_fresh<T: DeserializeOwned>(path: &Path, expected_fingerprint: &Fingerprint) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "cache read failed; treating as missing");
            return None;
        }
    };

    let envelope: Envelope<T> = match serde_json::from_str(&text) {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "cache file failed to parse; treating as missing");
            return None;
        }
    };

    if envelope.schema_version != SCHEMA_VERSION {
        tracing::debug!(path = %path.display(), "cache schema version mismatch; treating as missing");
        return None;
    }
    if envelope.fingerprint != expected_fingerprint.as_str() {
        return None;
    }

    Some(envelope.payload)
}

/// Writes `payload` to `path` atomically under `fingerprint`.
pub fn write_atomic_json<T: Serialize>(path: &Path, fingerprint: &Fingerprint, payload: &T) -> Result<(), CacheError> {
    let envelope = Envelope { schema_version: SCHEMA_VERSION, fingerprint: fingerprint.as_str().to_string(), payload };
    let json = serde_json::to_vec(&envelope).map_err(|source| CacheError::Json { path: path.to_path_buf(), source })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| CacheError::Write { path: path.to_path_buf(), source })?;
    }

    write_atomic(path, &json).map_err(|source| CacheError::Write { path: path.to_path_buf(), source })
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
    fn round_trips_on_matching_fingerprint() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("x.json");
        let fp = Fingerprint::from_bytes(b"input-v1");
        write_atomic_json(&path, &fp, &vec![1, 2, 3]).unwrap();

        let loaded: Option<Vec<i32>> = read_if_fresh(&path, &fp);
        assert_eq!(loaded, Some(vec![1, 2, 3]));
    }

    #[test]
    fn mismatched_fingerprint_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("x.json");
        write_atomic_json(&path, &Fingerprint::from_bytes(b"v1"), &42).unwrap();

        let loaded: Option<i32> = read_if_fresh(&path, &Fingerprint::from_bytes(b"v2"));
        assert_eq!(loaded, None);
    }

    #[test]
    fn missing_file_is_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let loaded: Option<i32> = read_if_fresh(&tmp.path().join("nope.json"), &Fingerprint::from_bytes(b"x"));
        assert_eq!(loaded, None);
    }
}
