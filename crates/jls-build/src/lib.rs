//! Build-tool classpath and docpath inference (spec.md §4.4): given a
//! workspace root, finds the jars (and their sources jars) a Maven, Gradle,
//! or Bazel build would put on the compile classpath, so the classpath
//! scanner never has to be told about them by hand.
//!
//! Resolution order: an explicit `classpath` configuration value always
//! wins; otherwise the build file present at the workspace root selects
//! Maven/Gradle/Bazel; if none is present (or the detected tool isn't on
//! `PATH`), the `CLASSPATH` environment variable is split on the platform
//! path separator as a last-resort fallback.

mod bazel;
mod cache;
mod command;
mod error;
mod gradle;
mod maven;
mod model;

pub use crate::cache::{BuildCache, CachedBuildResult};
pub use crate::command::{CommandOutput, CommandRunner, DefaultCommandRunner};
pub use crate::error::{BuildError, Result};
pub use crate::model::{BuildResult, BuildSystemKind};

use std::path::{Path, PathBuf};

/// Configuration equivalent to the `classpath`/`bazel.target` keys (spec.md
/// §6): an explicit classpath always takes precedence over build-tool
/// inference.
#[derive(Debug, Clone, Default)]
pub struct BuildConfig {
    pub explicit_classpath: Option<Vec<PathBuf>>,
    pub explicit_docpath: Option<Vec<PathBuf>>,
    pub bazel_target: Option<String>,
}

/// Infers the classpath/docpath for `workspace_root`, consulting the
/// fingerprint cache first and falling back to a live build-tool invocation
/// (or `CLASSPATH` env splitting) on a miss.
pub fn infer_build_result(
    workspace_root: &Path,
    config: &BuildConfig,
    runner: &dyn CommandRunner,
    cache_dir: Option<&Path>,
) -> Result<BuildResult> {
    if let Some(classpath) = &config.explicit_classpath {
        return Ok(BuildResult { classpath: classpath.clone(), docpath: config.explicit_docpath.clone().unwrap_or_default() });
    }

    let Some((kind, build_file)) = BuildSystemKind::detect(workspace_root) else {
        return Ok(BuildResult { classpath: classpath_from_env(), docpath: Vec::new() });
    };

    let cache = BuildCache::new(cache_dir);
    let external_deps = read_dependency_coordinates(&build_file, kind);
    let goal = match kind {
        BuildSystemKind::Explicit => unreachable!("handled above"),
        BuildSystemKind::Maven => "dependency:list",
        BuildSystemKind::Gradle => "jlsPrintClasspath",
        BuildSystemKind::Bazel => "aquery",
    };
    let extra_args: Vec<String> = config.bazel_target.iter().cloned().collect();
    let key = BuildCache::key(&build_file, &external_deps, goal, &extra_args);

    if let Some(cached) = cache.get(&build_file, &key) {
        return Ok(BuildResult { classpath: cached.classpath, docpath: cached.docpath });
    }

    let result = match kind {
        BuildSystemKind::Explicit => unreachable!("handled above"),
        BuildSystemKind::Maven => maven::infer(workspace_root, runner),
        BuildSystemKind::Gradle => gradle::infer(workspace_root, runner),
        BuildSystemKind::Bazel => {
            let target = config.bazel_target.as_deref().unwrap_or("//...");
            bazel::infer(workspace_root, target, runner)
        }
    };

    match result {
        Ok(result) => {
            cache.put(
                &build_file,
                &key,
                &CachedBuildResult { classpath: result.classpath.clone(), docpath: result.docpath.clone() },
            );
            Ok(result)
        }
        Err(err) => {
            tracing::warn!(error = %err, "build-tool classpath inference failed; falling back to CLASSPATH env");
            Ok(BuildResult { classpath: classpath_from_env(), docpath: Vec::new() })
        }
    }
}

fn classpath_from_env() -> Vec<PathBuf> {
    std::env::var_os("CLASSPATH").map(|v| std::env::split_paths(&v).collect()).unwrap_or_default()
}

/// A coarse scan for dependency coordinates in the build file, used only as
/// a cache-key input so a changed dependency set always invalidates a stale
/// cache entry even though the build file's own fingerprint already covers
/// most edits.
fn read_dependency_coordinates(build_file: &Path, kind: BuildSystemKind) -> Vec<String> {
    let Ok(text) = std::fs::read_to_string(build_file) else { return Vec::new() };
    match kind {
        BuildSystemKind::Maven => text
            .lines()
            .filter(|l| l.contains("<artifactId>") || l.contains("<groupId>") || l.contains("<version>"))
            .map(str::trim)
            .map(str::to_string)
            .collect(),
        BuildSystemKind::Gradle => text
            .lines()
            .filter(|l| l.contains("implementation") || l.contains("api(") || l.contains("testImplementation"))
            .map(str::trim)
            .map(str::to_string)
            .collect(),
        BuildSystemKind::Bazel | BuildSystemKind::Explicit => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tempfile::tempdir;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn explicit_classpath_short_circuits_detection() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        let config = BuildConfig { explicit_classpath: Some(vec![PathBuf::from("a.jar")]), ..Default::default() };
        let runner = DefaultCommandRunner::default();
        let result = infer_build_result(dir.path(), &config, &runner, None).unwrap();
        assert_eq!(result.classpath, vec![PathBuf::from("a.jar")]);
    }

    #[test]
    fn falls_back_to_classpath_env_when_no_build_file_present() {
        let _guard = ENV_LOCK.lock().unwrap();
        let dir = tempdir().unwrap();
        // SAFETY: serialized via ENV_LOCK; no concurrent access to CLASSPATH in this test binary.
        unsafe { std::env::set_var("CLASSPATH", "/a.jar:/b.jar") };
        let runner = DefaultCommandRunner::default();
        let result = infer_build_result(dir.path(), &BuildConfig::default(), &runner, None).unwrap();
        unsafe { std::env::remove_var("CLASSPATH") };
        assert_eq!(result.classpath, vec![PathBuf::from("/a.jar"), PathBuf::from("/b.jar")]);
    }

    #[test]
    fn detects_maven_project_by_pom_file() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("pom.xml"), b"<project/>").unwrap();
        let (kind, file) = BuildSystemKind::detect(dir.path()).unwrap();
        assert_eq!(kind, BuildSystemKind::Maven);
        assert_eq!(file, dir.path().join("pom.xml"));
    }
}
