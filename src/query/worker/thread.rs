//! Query Worker Thread
//!
//! Runs path evaluations on a dedicated OS thread so a pathological query
//! cannot block or crash the caller. Receives jobs via channel, evaluates
//! them one at a time and answers each on its own reply channel.

use std::any::Any;
use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread::JoinHandle;

use super::types::{FailureKind, Job, QueryRequest, QueryResponse};
use crate::query::evaluator::Evaluator;

const WORKER_THREAD_NAME: &str = "jpq-query-worker";

/// Parser and evaluator recursion runs on this stack
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

static PANIC_HOOK: Once = Once::new();

/// Handle to a running worker thread
///
/// Dropping the handle closes the job channel; the thread finishes whatever
/// it is evaluating and then exits.
#[derive(Debug)]
pub(crate) struct WorkerHandle {
    job_tx: Sender<Job>,
    thread: JoinHandle<()>,
    generation: u64,
}

impl WorkerHandle {
    pub fn is_alive(&self) -> bool {
        !self.thread.is_finished()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Hand a job to the thread, giving it back if the thread is gone
    pub fn submit(&self, job: Job) -> Result<(), Job> {
        self.job_tx.send(job).map_err(|e| e.0)
    }
}

/// Spawn a worker thread
///
/// Creates a background thread that:
/// 1. Listens for jobs on the job channel
/// 2. Evaluates each job unless it was cancelled before it started
/// 3. Sends the response back on the job's reply channel
///
/// A panic inside the evaluator is caught, reported as `WorkerCrashed` for the
/// job being handled, and ends the thread.
pub(crate) fn spawn_worker(
    evaluator: Arc<dyn Evaluator>,
    generation: u64,
) -> io::Result<WorkerHandle> {
    install_panic_hook();
    let (job_tx, job_rx) = channel();

    let thread = std::thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .stack_size(WORKER_STACK_SIZE)
        .spawn(move || worker_loop(evaluator.as_ref(), job_rx, generation))?;

    Ok(WorkerHandle {
        job_tx,
        thread,
        generation,
    })
}

/// Route worker panics to the log instead of stderr
///
/// The job that panicked is answered with `WorkerCrashed`, so the default
/// hook's message would only duplicate it. Panics on other threads still go
/// to the previous hook.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let prev_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            if std::thread::current().name() != Some(WORKER_THREAD_NAME) {
                prev_hook(panic_info);
                return;
            }

            log::error!(
                "Query worker panic: {} at {:?}",
                panic_message(panic_info.payload()),
                panic_info.location()
            );
        }));
    });
}

/// Main worker loop - processes jobs until the channel closes or a job panics
///
/// Uses blocking recv() which is fine in dedicated thread.
fn worker_loop(evaluator: &dyn Evaluator, job_rx: Receiver<Job>, generation: u64) {
    log::debug!("Query worker {} started", generation);

    while let Ok(job) = job_rx.recv() {
        let Job {
            request_id,
            request,
            reply,
        } = job;
        log::debug!(
            "Worker {} received request {}: {}",
            generation,
            request_id,
            request.query
        );

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            handle_request(evaluator, request_id, &request)
        }));

        match result {
            Ok(response) => {
                if reply.send(response).is_err() {
                    log::debug!("Request {} was abandoned by its caller", request_id);
                }
            }
            Err(payload) => {
                let panic_msg = panic_message(payload.as_ref());
                log::error!(
                    "Query worker {} panicked on request {}: {}",
                    generation,
                    request_id,
                    panic_msg
                );
                let _ = reply.send(QueryResponse::failure(
                    FailureKind::WorkerCrashed,
                    panic_msg,
                    request_id,
                ));
                break;
            }
        }
    }

    log::debug!("Query worker {} shutting down", generation);
}

/// Handle a single request
fn handle_request(
    evaluator: &dyn Evaluator,
    request_id: u64,
    request: &QueryRequest,
) -> QueryResponse {
    // Check if already cancelled
    if request.cancel_token.is_cancelled() {
        log::debug!("Request {} cancelled before evaluation", request_id);
        return QueryResponse::Cancelled { request_id };
    }

    match evaluator.evaluate(&request.document, &request.query, request.mode) {
        Ok(matches) => {
            log::debug!("Request {} produced {} matches", request_id, matches.len());
            QueryResponse::Success {
                matches,
                request_id,
            }
        }
        Err(e) => {
            log::debug!("Request {} failed: {}", request_id, e);
            QueryResponse::failure(FailureKind::Evaluation, e.message(), request_id)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic in query worker".to_string()
    }
}

#[cfg(test)]
#[path = "thread_tests.rs"]
mod thread_tests;
