pub mod evaluator;
pub mod orchestrator;
pub mod worker;

// Re-export public types
pub use evaluator::{EvaluationError, Evaluator, JsonPathEvaluator, QueryMode};
pub use orchestrator::{QueryOrchestrator, QueryOutcome};
pub use worker::{ExecutionWorkerPool, FailureKind, QueryRequest, QueryResponse};
