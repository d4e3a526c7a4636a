use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid contacts json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("command failed: {0}")]
    Command(String),
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, SourceError>;
