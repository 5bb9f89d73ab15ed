use std::path::PathBuf;

use thiserror::Error;

use crate::results::ResultStoreError;

/// Stable message shown instead of the evaluator's grammar diagnostics
pub const INVALID_EXPRESSION_MESSAGE: &str =
    "Please make sure your JSON path expression is valid!";

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Error parsing JSON: file is not json: {}", .0.display())]
    InvalidSourceFormat(PathBuf),

    #[error("Error parsing JSON: {0}")]
    ParseFailure(String),

    /// The raw evaluator message is kept for logging only
    #[error("{}", INVALID_EXPRESSION_MESSAGE)]
    GrammarFailure(String),

    #[error("{0}")]
    EvaluationFailure(String),

    #[error("Query worker crashed: {0}")]
    WorkerCrashed(String),

    #[error("Query worker unavailable: {0}")]
    WorkerUnavailable(String),

    #[error("Query cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    ResultStore(#[from] ResultStoreError),
}
