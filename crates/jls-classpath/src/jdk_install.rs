//! Locates the JDK a workspace should compile against: an explicit
//! config/`JAVA_HOME` override first, falling back to whatever `java` is
//! first on `PATH`.

use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Default)]
pub struct JdkDiscoveryConfig {
    /// Explicit override, e.g. from a workspace's `jdk.home` setting.
    pub home: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum JdkDiscoveryError {
    #[error("no JDK found: set `jdk.home`, $JAVA_HOME, or put `java` on PATH")]
    NotFound,
    #[error("configured JDK home {0} does not look like a JDK (no jmods/ or jre/lib)")]
    NotAJdk(PathBuf),
}

#[derive(Debug, Clone)]
pub struct JdkInstallation {
    root: PathBuf,
}

impl JdkInstallation {
    /// `config` takes priority, then `$JAVA_HOME`, then `java` resolved off
    /// `PATH`. A `JAVA_HOME` pointing at a JRE's `jre` subdirectory is
    /// coerced up to its parent, matching common JDK distribution layouts.
    pub fn discover(config: Option<&JdkDiscoveryConfig>) -> Result<Self, JdkDiscoveryError> {
        if let Some(home) = config.and_then(|c| c.home.as_ref()) {
            return Self::from_root(home.clone());
        }
        if let Some(java_home) = std::env::var_os("JAVA_HOME") {
            return Self::from_root(coerce_jre_subdir(PathBuf::from(java_home)));
        }
        if let Some(root) = discover_via_path() {
            return Self::from_root(root);
        }
        Err(JdkDiscoveryError::NotFound)
    }

    pub fn from_root(root: impl Into<PathBuf>) -> Result<Self, JdkDiscoveryError> {
        let root = coerce_jre_subdir(root.into());
        if !root.join("jmods").is_dir() && !root.join("jre").join("lib").is_dir() {
            return Err(JdkDiscoveryError::NotAJdk(root));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn jmods_dir(&self) -> PathBuf {
        self.root.join("jmods")
    }

    /// `lib/src.zip` (modern layout) or a bare `src.zip` at the JDK root
    /// (older layouts); `None` if neither is shipped.
    pub fn src_zip(&self) -> Option<PathBuf> {
        let lib = self.root.join("lib").join("src.zip");
        if lib.is_file() {
            return Some(lib);
        }
        let root = self.root.join("src.zip");
        root.is_file().then_some(root)
    }
}

fn coerce_jre_subdir(root: PathBuf) -> PathBuf {
    if root.file_name().map(|n| n == "jre").unwrap_or(false) && !root.join("jmods").is_dir() {
        if let Some(parent) = root.parent() {
            if parent.join("jmods").is_dir() {
                return parent.to_path_buf();
            }
        }
    }
    root
}

fn discover_via_path() -> Option<PathBuf> {
    let java = which_on_path("java")?;

    if let Ok(output) = Command::new(&java).args(["-XshowSettings:properties", "-version"]).output() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            if let Some(value) = line.trim().strip_prefix("java.home = ") {
                return Some(coerce_jre_subdir(PathBuf::from(value.trim())));
            }
        }
    }

    // No usable `java.home` output (e.g. a stubbed test binary): fall back to
    // the `<jdk-root>/bin/java` layout convention, resolving symlinks so a
    // version-manager shim still points at the real installation.
    let resolved = std::fs::canonicalize(&java).unwrap_or(java);
    resolved.parent()?.parent().map(|root| coerce_jre_subdir(root.to_path_buf()))
}

fn which_on_path(program: &str) -> Option<PathBuf> {
    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var).map(|dir| dir.join(program)).find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn jdk_layout(root: &Path) {
        std::fs::create_dir_all(root.join("jmods")).unwrap();
    }

    #[test]
    fn config_override_wins_over_java_home() {
        let config_root = tempdir().unwrap();
        jdk_layout(config_root.path());
        let other_root = tempdir().unwrap();
        jdk_layout(other_root.path());

        // SAFETY: test-only, single-threaded mutation of process env.
        unsafe { std::env::set_var("JAVA_HOME", other_root.path()) };
        let config = JdkDiscoveryConfig { home: Some(config_root.path().to_path_buf()) };
        let install = JdkInstallation::discover(Some(&config)).unwrap();
        assert_eq!(install.root(), config_root.path());
        unsafe { std::env::remove_var("JAVA_HOME") };
    }

    #[test]
    fn coerces_java_home_pointing_at_jre_subdir() {
        let root = tempdir().unwrap();
        jdk_layout(root.path());
        let jre = root.path().join("jre");
        std::fs::create_dir_all(&jre).unwrap();

        let install = JdkInstallation::from_root(jre).unwrap();
        assert_eq!(install.root(), root.path());
    }

    #[test]
    fn rejects_a_root_with_no_jmods_or_jre_lib() {
        let root = tempdir().unwrap();
        let err = JdkInstallation::from_root(root.path()).unwrap_err();
        assert!(matches!(err, JdkDiscoveryError::NotAJdk(_)));
    }

    #[test]
    fn finds_src_zip_under_lib_or_at_root() {
        let root = tempdir().unwrap();
        jdk_layout(root.path());
        let install = JdkInstallation::from_root(root.path()).unwrap();
        assert_eq!(install.src_zip(), None);

        std::fs::create_dir_all(root.path().join("lib")).unwrap();
        std::fs::write(root.path().join("lib").join("src.zip"), "").unwrap();
        assert_eq!(install.src_zip(), Some(root.path().join("lib").join("src.zip")));
    }
}
