//! Shared test utilities for jpq
//!
//! This module provides test evaluators and status surfaces used across
//! multiple test modules.

#[cfg(test)]
pub mod test_helpers {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde_json::Value;

    use crate::progress::StatusSurface;
    use crate::query::evaluator::{EvaluationError, Evaluator, JsonPathEvaluator, QueryMode};

    /// Query that makes [`ScriptedEvaluator`] panic
    pub const PANIC_QUERY: &str = "panic!";

    /// Prefix for queries that make [`ScriptedEvaluator`] sleep, e.g. `slow:200`
    pub const SLOW_PREFIX: &str = "slow:";

    /// Prefix for queries that make [`ScriptedEvaluator`] fail with the rest of the text
    pub const FAIL_PREFIX: &str = "fail:";

    /// Evaluator with scripted behavior, recording every call
    ///
    /// Queries without a special prefix are delegated to [`JsonPathEvaluator`].
    #[derive(Debug, Default)]
    pub struct ScriptedEvaluator {
        inner: JsonPathEvaluator,
        calls: AtomicUsize,
        events: Mutex<Vec<String>>,
    }

    impl ScriptedEvaluator {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// `start:<query>` / `end:<query>` entries in call order
        pub fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn record(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl Evaluator for ScriptedEvaluator {
        fn evaluate(
            &self,
            document: &Value,
            query: &str,
            mode: QueryMode,
        ) -> Result<Vec<String>, EvaluationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.record(format!("start:{}", query));

            let result = if query == PANIC_QUERY {
                panic!("evaluator exploded");
            } else if let Some(ms) = query.strip_prefix(SLOW_PREFIX) {
                let ms: u64 = ms.parse().unwrap();
                std::thread::sleep(Duration::from_millis(ms));
                Ok(vec![format!("\"{}\"", query)])
            } else if let Some(message) = query.strip_prefix(FAIL_PREFIX) {
                Err(EvaluationError::new(message))
            } else {
                self.inner.evaluate(document, query, mode)
            };

            self.record(format!("end:{}", query));
            result
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum StatusEvent {
        Show(String),
        Clear,
    }

    /// Status surface that remembers everything drawn on it
    #[derive(Debug, Default)]
    pub struct RecordingStatus {
        events: Mutex<Vec<StatusEvent>>,
    }

    impl RecordingStatus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn events(&self) -> Vec<StatusEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn shown(&self) -> Vec<String> {
            self.events()
                .into_iter()
                .filter_map(|e| match e {
                    StatusEvent::Show(text) => Some(text),
                    StatusEvent::Clear => None,
                })
                .collect()
        }

        pub fn was_cleared(&self) -> bool {
            self.events().contains(&StatusEvent::Clear)
        }
    }

    impl StatusSurface for RecordingStatus {
        fn show(&self, text: &str) {
            self.events
                .lock()
                .unwrap()
                .push(StatusEvent::Show(text.to_string()));
        }

        fn clear(&self) {
            self.events.lock().unwrap().push(StatusEvent::Clear);
        }
    }
}
