use std::time::Duration;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`workers` must be between 1 and {}", crate::config::MAX_WORKERS)]
    InvalidWorkers,

    #[error("`duration` must be at least 1s (got {0:?})")]
    InvalidDuration(Duration),

    #[error("invalid base url `{0}` (expected http:// or https://)")]
    InvalidBaseUrl(String),

    #[error("think time range is empty ({min:?} > {max:?})")]
    InvalidThinkTime { min: Duration, max: Duration },

    #[error("results directory does not exist: `{0}`")]
    MissingResultsDir(String),
}
