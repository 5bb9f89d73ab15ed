//! jpq library - JSONPath query execution
//!
//! Evaluates path queries against parsed JSON documents on an isolated
//! worker thread and publishes the matches as addressable result artifacts.

pub mod config;
pub mod error;
pub mod input;
pub mod progress;
pub mod query;
pub mod results;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::QueryError;
pub use query::{ExecutionWorkerPool, QueryOrchestrator, QueryOutcome};
pub use results::{ResultArtifactId, ResultStore};
