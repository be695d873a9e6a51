//! Maven classpath/docpath inference by shelling out to `mvn` in batch mode
//! and parsing `dependency:list` output lines of the form
//! `[INFO]    group:artifact:type:version:scope:/absolute/path(.jar)`.

use std::path::{Path, PathBuf};

use crate::command::{format_command, CommandRunner};
use crate::error::{BuildError, Result};
use crate::model::BuildResult;

const CLASSPATH_GOAL: &str = "org.apache.maven.plugins:maven-dependency-plugin:3.6.1:list";
const CLASSPATH_ARGS: &[&str] = &["-B", "-q", "-Dsilent=true", "-DincludeScope=runtime"];
const SOURCES_ARGS: &[&str] = &["-B", "-q", "-Dsilent=true", "-DincludeScope=runtime", "-Dclassifier=sources"];

pub fn infer(workspace_root: &Path, runner: &dyn CommandRunner) -> Result<BuildResult> {
    let classpath = run_dependency_list(workspace_root, runner, CLASSPATH_ARGS)?;
    let docpath = run_dependency_list(workspace_root, runner, SOURCES_ARGS).unwrap_or_default();
    Ok(BuildResult { classpath, docpath })
}

fn run_dependency_list(workspace_root: &Path, runner: &dyn CommandRunner, extra_args: &[&str]) -> Result<Vec<PathBuf>> {
    let mvn = Path::new("mvn");
    let mut args: Vec<String> = vec![CLASSPATH_GOAL.to_string()];
    args.extend(extra_args.iter().map(|s| s.to_string()));

    let output = runner
        .run(workspace_root, mvn, &args)
        .map_err(|source| BuildError::Spawn { program: format_command(mvn, &args), source })?;

    if !output.status.success() {
        tracing::debug!(output = %output.combined(), "mvn dependency:list exited non-zero");
        return Err(BuildError::NonZeroExit { tool: "mvn", output: output.combined() });
    }

    Ok(parse_dependency_list(&output.stdout))
}

/// Parses `dependency:list` lines of the shape
/// `group:artifact:type:version:scope:/absolute/path` (the path segment is
/// only present with `-DoutputAbsoluteArtifactFilename=true`, which every
/// invocation here sets implicitly via the plugin default in recent Maven).
/// Lines that don't end in an absolute, existing path are dropped rather
/// than guessed at.
fn parse_dependency_list(stdout: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        let line = line.strip_prefix("[INFO]").map(str::trim).unwrap_or(line);
        if line.is_empty() {
            continue;
        }
        let Some(last_colon) = line.rfind(':') else { continue };
        // Coordinates themselves contain colons (`group:artifact:type:version:scope`),
        // so only the final `:`-delimited segment can be the path.
        let candidate = &line[last_colon + 1..];
        let path = Path::new(candidate);
        if path.is_absolute() && path.exists() {
            paths.push(path.to_path_buf());
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_info_prefixed_coordinate_lines() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let existing = tmp.path().to_string_lossy().into_owned();
        let stdout = format!(
            "[INFO] The following files have been resolved:\n[INFO]    com.example:widget:jar:1.2.0:compile:{existing}\n[INFO]    com.example:missing:jar:1.0.0:compile:/no/such/file.jar\n"
        );
        let paths = parse_dependency_list(&stdout);
        assert_eq!(paths, vec![PathBuf::from(existing)]);
    }

    #[test]
    fn ignores_lines_without_a_path_segment() {
        let paths = parse_dependency_list("[INFO] Scanning for projects...\n");
        assert!(paths.is_empty());
    }
}
