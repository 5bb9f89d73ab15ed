//! Query orchestration
//!
//! Public entry point for running one path query: starts the progress
//! indicator, submits the request to the worker pool, turns failures into
//! user-facing errors and publishes successful matches.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::evaluator::QueryMode;
use super::worker::{ExecutionWorkerPool, FailureKind, QueryRequest, QueryResponse};
use crate::error::QueryError;
use crate::progress::{ProgressReporter, ProgressSettings, StatusSurface};
use crate::results::{ResultArtifactId, ResultStore};

/// Evaluator messages with these markers are grammar failures
const GRAMMAR_FAILURE_SIGNATURES: [&str; 2] = ["Parse error", "Lexical error"];

/// A successfully published query
#[derive(Debug)]
pub struct QueryOutcome {
    pub artifact: ResultArtifactId,
    /// Still ticking; the display layer may dispose it early
    pub progress: ProgressReporter,
}

pub struct QueryOrchestrator {
    pool: Arc<ExecutionWorkerPool>,
    store: Arc<ResultStore>,
    status: Arc<dyn StatusSurface>,
    progress: ProgressSettings,
}

impl QueryOrchestrator {
    pub fn new(
        pool: Arc<ExecutionWorkerPool>,
        store: Arc<ResultStore>,
        status: Arc<dyn StatusSurface>,
    ) -> Self {
        Self {
            pool,
            store,
            status,
            progress: ProgressSettings::default(),
        }
    }

    pub fn with_progress_settings(mut self, progress: ProgressSettings) -> Self {
        self.progress = progress;
        self
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Run a query to completion
    ///
    /// Returns `Ok(None)` without doing anything when the query text is blank.
    pub async fn run(
        &self,
        input_text: &str,
        contents: Arc<Value>,
        nodes: bool,
    ) -> Result<Option<QueryOutcome>, QueryError> {
        self.run_with_cancel(input_text, contents, nodes, CancellationToken::new())
            .await
    }

    /// Run a query that the user can cancel
    ///
    /// Cancelling the token aborts the evaluation and removes the progress
    /// indicator.
    pub async fn run_with_cancel(
        &self,
        input_text: &str,
        contents: Arc<Value>,
        nodes: bool,
        cancel_token: CancellationToken,
    ) -> Result<Option<QueryOutcome>, QueryError> {
        if input_text.trim().is_empty() {
            log::debug!("Ignoring blank query");
            return Ok(None);
        }

        let progress = ProgressReporter::start(
            input_text,
            self.progress,
            self.status.clone(),
            cancel_token.child_token(),
        );

        let request = QueryRequest::new(input_text, contents, QueryMode::from_nodes_flag(nodes))
            .with_cancel_token(cancel_token);

        match self.pool.evaluate(request).await {
            QueryResponse::Success {
                matches,
                request_id,
            } => {
                let artifact = self.store.publish(&matches)?;
                log::debug!("Request {} published as {}", request_id, artifact);
                Ok(Some(QueryOutcome { artifact, progress }))
            }
            QueryResponse::Failure {
                kind,
                message,
                request_id,
            } => {
                log::debug!("Request {} failed ({:?}): {}", request_id, kind, message);
                if kind == FailureKind::Unavailable {
                    progress.dispose();
                }
                Err(classify_failure(kind, message))
            }
            QueryResponse::Cancelled { request_id } => {
                log::debug!("Request {} cancelled", request_id);
                Err(QueryError::Cancelled)
            }
        }
    }
}

/// Whether an evaluator message reports a lexing or parsing failure
pub fn is_grammar_failure(message: &str) -> bool {
    GRAMMAR_FAILURE_SIGNATURES
        .iter()
        .any(|signature| message.contains(signature))
}

/// Map a worker failure to the error shown to the user
pub fn classify_failure(kind: FailureKind, message: String) -> QueryError {
    match kind {
        FailureKind::Evaluation if is_grammar_failure(&message) => {
            QueryError::GrammarFailure(message)
        }
        FailureKind::Evaluation => QueryError::EvaluationFailure(message),
        FailureKind::WorkerCrashed => QueryError::WorkerCrashed(message),
        FailureKind::Unavailable => QueryError::WorkerUnavailable(message),
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
