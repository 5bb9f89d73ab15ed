//! Query Worker Types
//!
//! Type definitions for the query worker thread communication.
//! These types enable request/response pattern with cancellation support.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::query::evaluator::QueryMode;

/// Request to evaluate a path expression
#[derive(Debug, Clone)]
pub struct QueryRequest {
    /// The path expression to evaluate (e.g., "$.items[*]")
    pub query: String,
    /// Parsed document, read-only for the duration of the request
    pub document: Arc<Value>,
    pub mode: QueryMode,
    /// Token for cancelling this request
    pub cancel_token: CancellationToken,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, document: Arc<Value>, mode: QueryMode) -> Self {
        Self {
            query: query.into(),
            document,
            mode,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn with_cancel_token(mut self, cancel_token: CancellationToken) -> Self {
        self.cancel_token = cancel_token;
        self
    }
}

/// Why a request failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The evaluator rejected the expression or failed while running it
    Evaluation,
    /// The worker context died while handling the request
    WorkerCrashed,
    /// The request never reached a worker context
    Unavailable,
}

/// Response from query evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResponse {
    /// Evaluation succeeded
    Success {
        /// One JSON string per match, in document order
        matches: Vec<String>,
        /// Request ID this response belongs to
        request_id: u64,
    },
    /// Evaluation failed
    Failure {
        kind: FailureKind,
        message: String,
        /// Request ID this response belongs to
        /// Note: request_id = 0 means the request was never assigned to a worker
        request_id: u64,
    },
    /// Evaluation was cancelled
    Cancelled {
        /// Request ID that was cancelled
        request_id: u64,
    },
}

impl QueryResponse {
    pub fn request_id(&self) -> u64 {
        match self {
            QueryResponse::Success { request_id, .. }
            | QueryResponse::Failure { request_id, .. }
            | QueryResponse::Cancelled { request_id } => *request_id,
        }
    }

    pub(crate) fn failure(kind: FailureKind, message: impl Into<String>, request_id: u64) -> Self {
        QueryResponse::Failure {
            kind,
            message: message.into(),
            request_id,
        }
    }
}

/// One unit of work handed to the worker thread
#[derive(Debug)]
pub(crate) struct Job {
    pub request_id: u64,
    pub request: QueryRequest,
    pub reply: oneshot::Sender<QueryResponse>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
