//! Gradle classpath/docpath inference: runs Gradle with a small init script
//! that adds a task printing each resolved artifact on its own line, prefixed
//! so it can be picked out from the rest of Gradle's console noise.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::command::{format_command, CommandRunner};
use crate::error::{BuildError, Result};
use crate::model::BuildResult;

const CLASSPATH_MARKER: &str = "JLS-CLASSPATH:";
const SOURCES_MARKER: &str = "JLS-SOURCES:";

const INIT_SCRIPT: &str = r#"
allprojects {
    afterEvaluate {
        tasks.register("jlsPrintClasspath") {
            doLast {
                configurations.findByName("runtimeClasspath")?.files?.forEach { println("JLS-CLASSPATH:" + it.absolutePath) }
            }
        }
        tasks.register("jlsPrintSources") {
            doLast {
                configurations.findByName("runtimeClasspath")?.resolvedConfiguration?.lenientConfiguration?.artifacts?.forEach {
                    val sources = it.file.absolutePath.replace(".jar", "-sources.jar")
                    if (java.io.File(sources).exists()) println("JLS-SOURCES:" + sources)
                }
            }
        }
    }
}
"#;

pub fn infer(workspace_root: &Path, runner: &dyn CommandRunner) -> Result<BuildResult> {
    let init_script = write_init_script()?;
    let gradle = Path::new("gradle");
    let args: Vec<String> = vec![
        "--console=plain".into(),
        "-q".into(),
        "--init-script".into(),
        init_script.to_string_lossy().into_owned(),
        "jlsPrintClasspath".into(),
        "jlsPrintSources".into(),
    ];

    let output = runner
        .run(workspace_root, gradle, &args)
        .map_err(|source| BuildError::Spawn { program: format_command(gradle, &args), source })?;

    if !output.status.success() {
        tracing::debug!(output = %output.combined(), "gradle invocation exited non-zero");
        return Err(BuildError::NonZeroExit { tool: "gradle", output: output.combined() });
    }

    Ok(parse_marked_output(&output.stdout))
}

fn write_init_script() -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("jls-init-")
        .suffix(".gradle.kts")
        .tempfile()
        .map_err(|source| BuildError::Spawn { program: "gradle init script".into(), source })?;
    file.write_all(INIT_SCRIPT.as_bytes())
        .map_err(|source| BuildError::Spawn { program: "gradle init script".into(), source })?;
    let (_, path) = file.keep().map_err(|e| BuildError::Spawn { program: "gradle init script".into(), source: e.error })?;
    Ok(path)
}

fn parse_marked_output(stdout: &str) -> BuildResult {
    let mut classpath = Vec::new();
    let mut docpath = Vec::new();
    for line in stdout.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(CLASSPATH_MARKER) {
            classpath.push(PathBuf::from(rest));
        } else if let Some(rest) = line.strip_prefix(SOURCES_MARKER) {
            docpath.push(PathBuf::from(rest));
        }
    }
    BuildResult { classpath, docpath }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_classpath_and_sources_markers() {
        let stdout = "JLS-CLASSPATH:/home/u/.gradle/caches/a.jar\nnoise\nJLS-SOURCES:/home/u/.gradle/caches/a-sources.jar\n";
        let result = parse_marked_output(stdout);
        assert_eq!(result.classpath, vec![PathBuf::from("/home/u/.gradle/caches/a.jar")]);
        assert_eq!(result.docpath, vec![PathBuf::from("/home/u/.gradle/caches/a-sources.jar")]);
    }
}
