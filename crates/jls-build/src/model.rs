use std::path::PathBuf;

/// The inferred classpath/docpath a build tool reports for a workspace,
/// before it is narrowed down to just the external (non-project) jars that
/// the classpath scanner (spec.md §4.4) needs to index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub classpath: Vec<PathBuf>,
    pub docpath: Vec<PathBuf>,
}

impl BuildResult {
    pub fn to_classpath(&self) -> jls_classpath::Classpath {
        jls_classpath::Classpath::new(self.classpath.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildSystemKind {
    Explicit,
    Maven,
    Gradle,
    Bazel,
}

impl BuildSystemKind {
    /// Detects the build system in use from the files present at
    /// `workspace_root`, in priority order. An explicit `classpath`
    /// configuration key always wins and is handled by the caller before
    /// this is consulted.
    pub fn detect(workspace_root: &std::path::Path) -> Option<(Self, PathBuf)> {
        let pom = workspace_root.join("pom.xml");
        if pom.is_file() {
            return Some((Self::Maven, pom));
        }
        for name in ["build.gradle.kts", "build.gradle"] {
            let path = workspace_root.join(name);
            if path.is_file() {
                return Some((Self::Gradle, path));
            }
        }
        for name in ["MODULE.bazel", "WORKSPACE", "WORKSPACE.bazel"] {
            let path = workspace_root.join(name);
            if path.is_file() {
                return Some((Self::Bazel, path));
            }
        }
        None
    }
}
