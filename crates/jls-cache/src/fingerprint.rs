//! Stable content fingerprints used as cache keys (spec.md §3 "Fingerprint").

use sha2::{Digest, Sha256};
use std::io::Read;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes.as_ref());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buf = [0_u8; 64 * 1024];
        loop {
            let read = reader.read(&mut buf)?;
            if read == 0 {
                break;
            }
            hasher.update(&buf[..read]);
        }
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        Self::from_reader(std::fs::File::open(path)?)
    }

    /// A fast metadata-only fingerprint: `(size, mtime)`. Intended for
    /// high-frequency freshness checks (e.g. the token index) where hashing
    /// full file contents on every lookup would be wasteful.
    pub fn from_file_metadata(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        let modified_nanos = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(std::time::UNIX_EPOCH).ok())
            .map(|d| d.as_nanos())
            .unwrap_or(0);

        let mut bytes = Vec::with_capacity(24);
        bytes.extend_from_slice(&meta.len().to_le_bytes());
        bytes.extend_from_slice(&modified_nanos.to_le_bytes());
        Ok(Self::from_bytes(bytes))
    }

    /// Combine several fingerprints into one, order-sensitive. Used to build
    /// a build-fingerprint (spec.md §3) from `(workspace root, dependency
    /// coordinates, settings file, build-file stat tuples)`.
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a Fingerprint>) -> Self {
        let mut hasher = Sha256::new();
        for part in parts {
            hasher.update(part.0.as_bytes());
            hasher.update([0u8]);
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_inputs_yield_identical_fingerprint() {
        assert_eq!(Fingerprint::from_bytes("x"), Fingerprint::from_bytes("x"));
        assert_ne!(Fingerprint::from_bytes("x"), Fingerprint::from_bytes("y"));
    }

    #[test]
    fn combine_is_order_sensitive() {
        let a = Fingerprint::from_bytes("a");
        let b = Fingerprint::from_bytes("b");
        assert_ne!(Fingerprint::combine([&a, &b]), Fingerprint::combine([&b, &a]));
    }
}
