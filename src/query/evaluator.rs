//! JSONPath evaluation
//!
//! The evaluator is a pure function boundary: it borrows a parsed document,
//! runs one path expression against it and returns every match as a JSON
//! string. It holds no state between calls, so one instance can be shared by
//! every worker context the pool creates.

use serde_json::{Value, json};
use serde_json_path::JsonPath;

/// Deepest bracket, parenthesis or `!` nesting accepted before parsing
pub const MAX_QUERY_NESTING: usize = 128;

/// How matches are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryMode {
    /// Bare matched values
    #[default]
    Normal,
    /// `{"path": ..., "value": ...}` pairs
    WithNodes,
}

impl QueryMode {
    pub fn from_nodes_flag(nodes: bool) -> Self {
        if nodes {
            QueryMode::WithNodes
        } else {
            QueryMode::Normal
        }
    }
}

/// Failure reported by an evaluator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationError {
    message: String,
}

impl EvaluationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for EvaluationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for EvaluationError {}

/// Runs a path expression against a document
pub trait Evaluator: Send + Sync {
    fn evaluate(
        &self,
        document: &Value,
        query: &str,
        mode: QueryMode,
    ) -> Result<Vec<String>, EvaluationError>;
}

/// RFC 9535 JSONPath evaluator
///
/// Grammar failures are reported as `Parse error: ...` so callers can tell
/// them apart from other failures by message signature alone.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPathEvaluator;

impl JsonPathEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for JsonPathEvaluator {
    fn evaluate(
        &self,
        document: &Value,
        query: &str,
        mode: QueryMode,
    ) -> Result<Vec<String>, EvaluationError> {
        // The parser recurses once per nesting level
        if nesting_depth(query) > MAX_QUERY_NESTING {
            return Err(EvaluationError::new(format!(
                "Parse error on {:?}: expression nests deeper than {} levels",
                query, MAX_QUERY_NESTING
            )));
        }

        let path = JsonPath::parse(query)
            .map_err(|e| EvaluationError::new(format!("Parse error on {:?}: {}", query, e)))?;

        let serialize = |value: &Value| {
            serde_json::to_string(value)
                .map_err(|e| EvaluationError::new(format!("Failed to serialize match: {}", e)))
        };

        match mode {
            QueryMode::Normal => path.query(document).all().into_iter().map(serialize).collect(),
            QueryMode::WithNodes => path
                .query_located(document)
                .into_iter()
                .map(|node| {
                    serialize(&json!({
                        "path": node.location().to_string(),
                        "value": node.node(),
                    }))
                })
                .collect(),
        }
    }
}

/// Deepest nesting of `(`, `[` and `!` outside string literals
fn nesting_depth(query: &str) -> usize {
    let mut depth = 0usize;
    let mut negations = 0usize;
    let mut max_depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    let mut chars = query.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' => quote = Some(c),
            '(' | '[' => {
                depth += 1;
                negations = 0;
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                negations = 0;
            }
            '!' if chars.peek() != Some(&'=') => negations += 1,
            c if c.is_whitespace() => {}
            _ => negations = 0,
        }
        max_depth = max_depth.max(depth + negations);
    }

    max_depth
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod evaluator_tests;
