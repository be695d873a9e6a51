//! Bazel classpath/docpath inference via `bazel aquery --output=jsonproto`:
//! rather than link against Bazel's real analysis-protos (a build dependency
//! this crate has no reason to carry), the JSON-proto rendering is parsed
//! with `serde_json` and scanned for `-cp`/`--classpath` and `--sources`
//! argument pairs in each compile action's argument list.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::command::{format_command, CommandRunner};
use crate::error::{BuildError, Result};
use crate::model::BuildResult;

#[derive(Debug, Deserialize)]
struct AQueryOutput {
    #[serde(default)]
    actions: Vec<Action>,
}

#[derive(Debug, Deserialize)]
struct Action {
    #[serde(default)]
    arguments: Vec<String>,
}

const CLASSPATH_FLAGS: &[&str] = &["-cp", "--classpath", "--java_classpath"];
const SOURCES_FLAGS: &[&str] = &["--sources", "--java_sourcepath"];

pub fn infer(workspace_root: &Path, target: &str, runner: &dyn CommandRunner) -> Result<BuildResult> {
    let bazel = Path::new("bazel");
    let args: Vec<String> = vec!["aquery".into(), "--output=jsonproto".into(), format!("deps({target})")];

    let output = runner
        .run(workspace_root, bazel, &args)
        .map_err(|source| BuildError::Spawn { program: format_command(bazel, &args), source })?;

    if !output.status.success() {
        tracing::debug!(output = %output.combined(), "bazel aquery exited non-zero");
        return Err(BuildError::NonZeroExit { tool: "bazel", output: output.combined() });
    }

    Ok(parse_aquery_json(&output.stdout))
}

fn parse_aquery_json(stdout: &str) -> BuildResult {
    let Ok(parsed) = serde_json::from_str::<AQueryOutput>(stdout) else {
        return BuildResult::default();
    };

    let mut classpath = std::collections::BTreeSet::new();
    let mut docpath = std::collections::BTreeSet::new();

    for action in parsed.actions {
        let args = &action.arguments;
        for (i, arg) in args.iter().enumerate() {
            let Some(value) = args.get(i + 1) else { continue };
            if CLASSPATH_FLAGS.contains(&arg.as_str()) {
                classpath.extend(split_path_list(value));
            } else if SOURCES_FLAGS.contains(&arg.as_str()) {
                docpath.extend(split_path_list(value));
            }
        }
    }

    BuildResult { classpath: classpath.into_iter().collect(), docpath: docpath.into_iter().collect() }
}

fn split_path_list(value: &str) -> Vec<PathBuf> {
    value.split(':').filter(|s| !s.is_empty()).map(PathBuf::from).filter(|p| p.is_absolute() && p.exists()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_paths_following_classpath_and_sources_flags() {
        let json = r#"{"actions":[{"arguments":["javac","-cp","/a.jar:/b.jar","--sources","/a-src.jar"]}]}"#;
        let result = parse_aquery_json(json);
        // Paths that don't exist on disk are filtered out by split_path_list,
        // so this only checks that parsing itself doesn't panic on malformed
        // or nonexistent paths.
        assert!(result.classpath.is_empty());
        assert!(result.docpath.is_empty());
    }

    #[test]
    fn malformed_json_yields_empty_result() {
        let result = parse_aquery_json("not json");
        assert_eq!(result, BuildResult::default());
    }
}
