//! Execution Worker Pool
//!
//! Owns one long-lived worker thread and serializes every evaluation through
//! it. The pool is the only thing that ever touches the worker, so callers
//! cannot use the thread concurrently.
//!
//! Failure handling:
//! - A crashed worker fails the pending request with `WorkerCrashed`; the
//!   request is not retried. The next submission spawns a fresh worker.
//! - Cancelling an in-flight request abandons the busy worker (it exits once
//!   its evaluation ends, the result discarded) and answers `Cancelled`
//!   immediately.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, oneshot};

use super::thread::{WorkerHandle, spawn_worker};
use super::types::{FailureKind, Job, QueryRequest, QueryResponse};
use crate::query::evaluator::{Evaluator, JsonPathEvaluator};

#[derive(Debug, Default)]
struct PoolSlot {
    worker: Option<WorkerHandle>,
    closed: bool,
}

pub struct ExecutionWorkerPool {
    evaluator: Arc<dyn Evaluator>,
    /// Held for the whole request: this lock is the single-flight queue
    slot: Mutex<PoolSlot>,
    /// Current request ID counter (starts at 1, 0 reserved for unassigned requests)
    next_request_id: AtomicU64,
    next_generation: AtomicU64,
}

impl Default for ExecutionWorkerPool {
    fn default() -> Self {
        Self::new(Arc::new(JsonPathEvaluator::new()))
    }
}

impl std::fmt::Debug for ExecutionWorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionWorkerPool")
            .field("next_request_id", &self.next_request_id)
            .field("next_generation", &self.next_generation)
            .finish_non_exhaustive()
    }
}

impl ExecutionWorkerPool {
    /// Create a pool around an evaluator
    ///
    /// The worker thread is not started until the first submission.
    pub fn new(evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            slot: Mutex::new(PoolSlot::default()),
            next_request_id: AtomicU64::new(1),
            next_generation: AtomicU64::new(1),
        }
    }

    /// Evaluate one request on the worker thread
    ///
    /// Waits for any earlier request to finish first, so responses are
    /// observed in submission order.
    pub async fn evaluate(&self, request: QueryRequest) -> QueryResponse {
        let mut slot = self.slot.lock().await;

        if slot.closed {
            return QueryResponse::failure(FailureKind::Unavailable, "worker pool is shut down", 0);
        }

        if request.cancel_token.is_cancelled() {
            return QueryResponse::Cancelled { request_id: 0 };
        }

        let request_id = self.next_request_id.fetch_add(1, Ordering::SeqCst);
        let cancel_token = request.cancel_token.clone();
        let (reply, reply_rx) = oneshot::channel();
        let job = Job {
            request_id,
            request,
            reply,
        };

        let worker = match self.live_worker(&mut slot) {
            Ok(worker) => worker,
            Err(e) => {
                log::error!("Failed to spawn query worker: {}", e);
                return QueryResponse::failure(
                    FailureKind::Unavailable,
                    format!("failed to start worker thread: {}", e),
                    0,
                );
            }
        };

        if worker.submit(job).is_err() {
            log::error!("Query worker {} is gone, dropping it", worker.generation());
            slot.worker = None;
            return QueryResponse::failure(
                FailureKind::Unavailable,
                "worker thread stopped before accepting the request",
                0,
            );
        }

        tokio::select! {
            biased;

            _ = cancel_token.cancelled() => {
                log::debug!("Request {} cancelled in flight, tearing down worker", request_id);
                slot.worker = None;
                QueryResponse::Cancelled { request_id }
            }
            reply = reply_rx => settle_reply(&mut slot, request_id, reply),
        }
    }

    /// Stop the worker and refuse further submissions
    ///
    /// Waits for an in-flight request to finish.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        slot.closed = true;
        if let Some(worker) = slot.worker.take() {
            log::debug!("Shutting down query worker {}", worker.generation());
        }
    }

    pub async fn is_shut_down(&self) -> bool {
        self.slot.lock().await.closed
    }

    /// Generation of the current worker, if one is running
    pub async fn worker_generation(&self) -> Option<u64> {
        self.slot
            .lock()
            .await
            .worker
            .as_ref()
            .filter(|w| w.is_alive())
            .map(WorkerHandle::generation)
    }

    fn live_worker<'a>(&self, slot: &'a mut PoolSlot) -> std::io::Result<&'a WorkerHandle> {
        if slot.worker.as_ref().is_some_and(|w| !w.is_alive()) {
            log::debug!("Query worker died between requests, replacing it");
            slot.worker = None;
        }

        if slot.worker.is_none() {
            let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
            log::debug!("Spawning query worker {}", generation);
            slot.worker = Some(spawn_worker(self.evaluator.clone(), generation)?);
        }

        slot.worker
            .as_ref()
            .ok_or_else(|| std::io::Error::other("worker slot empty after spawn"))
    }
}

/// Turn the worker's answer into the caller's response
///
/// A reply channel dropped without an answer means the thread died mid-job.
fn settle_reply(
    slot: &mut PoolSlot,
    request_id: u64,
    reply: Result<QueryResponse, oneshot::error::RecvError>,
) -> QueryResponse {
    match reply {
        Ok(response) => {
            if matches!(
                response,
                QueryResponse::Failure {
                    kind: FailureKind::WorkerCrashed,
                    ..
                }
            ) {
                slot.worker = None;
            }
            response
        }
        Err(_) => {
            log::error!("Query worker dropped request {} without answering", request_id);
            slot.worker = None;
            QueryResponse::failure(
                FailureKind::WorkerCrashed,
                "worker thread terminated unexpectedly",
                request_id,
            )
        }
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod pool_tests;
