use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid Range Error: {0}")]
    InvalidRange(String),
    #[error("Aggregation Error: {0}")]
    Aggregation(String),
    #[error("Persistence Error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Failures raised while writing one of the output sinks.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("output directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("I/O Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV Error: {0}")]
    Csv(#[from] csv::Error),
    #[error("SQLite Error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
