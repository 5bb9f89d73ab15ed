//! Query Worker Module
//!
//! Runs path evaluations on a dedicated thread so a slow or faulty query
//! never blocks or crashes the caller. The pool submits one job at a time,
//! awaits the reply and reports crashes and cancellations as values.
//!
//! ## Architecture
//!
//! - Single background thread with a std::sync::mpsc job channel
//! - Blocking recv() in the dedicated thread (not async)
//! - One tokio oneshot reply channel per job, so callers await responses
//! - catch_unwind around each evaluation; a panic ends the thread
//! - Async mutex around the worker slot for single-flight submission
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use jpq::query::evaluator::QueryMode;
//! use jpq::query::worker::{ExecutionWorkerPool, QueryRequest, QueryResponse};
//!
//! let pool = ExecutionWorkerPool::default();
//! let document = Arc::new(serde_json::json!({"a": [1, 2, 3]}));
//!
//! match pool.evaluate(QueryRequest::new("$.a[*]", document, QueryMode::Normal)).await {
//!     QueryResponse::Success { matches, .. } => println!("{:?}", matches),
//!     QueryResponse::Failure { message, .. } => eprintln!("{}", message),
//!     QueryResponse::Cancelled { .. } => println!("Cancelled"),
//! }
//! ```

pub mod pool;
mod thread;
pub mod types;

// Re-exports for convenience
pub use pool::ExecutionWorkerPool;
pub use types::{FailureKind, QueryRequest, QueryResponse};
