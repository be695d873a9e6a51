#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("failed to read {path}: {source}")]
    ReadFile { path: std::path::PathBuf, source: std::io::Error },
}

pub type Result<T> = std::result::Result<T, DbError>;
