use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to launch {program}: {source}")]
    Spawn { program: String, source: std::io::Error },
    #[error("{tool} exited with a non-zero status; treating classpath as empty:\n{output}")]
    NonZeroExit { tool: &'static str, output: String },
    #[error("{tool} invocation timed out")]
    TimedOut { tool: &'static str },
    #[error("no build file found under {root}")]
    NoBuildFileFound { root: PathBuf },
}

pub type Result<T> = std::result::Result<T, BuildError>;
