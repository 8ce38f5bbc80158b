use thiserror::Error;

pub type Result<T> = std::result::Result<T, FameError>;

#[derive(Error, Debug)]
pub enum FameError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },
    #[error("`{command}` failed: {stderr}")]
    GitCommand { command: String, stderr: String },
    #[error("`{command}` produced non-UTF-8 output")]
    NonUtf8Output { command: String },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
