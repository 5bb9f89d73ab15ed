//! Published query results
//!
//! A result is never stored anywhere: its locator carries the lines
//! themselves, so resolving is a pure decode and an artifact lives exactly as
//! long as somebody holds its id.
//!
//! Locator form: `jpq:results-<sequence>.json?<payload>`, where the payload
//! is the unpadded URL-safe base64 of the lines as a JSON array.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::Value;
use thiserror::Error;

pub const SCHEME: &str = "jpq";

const PATH_PREFIX: &str = "results-";
const PATH_SUFFIX: &str = ".json";

#[derive(Debug, Error)]
pub enum ResultStoreError {
    #[error("Not a result locator: {0}")]
    InvalidLocator(String),

    #[error("Corrupt result payload: {0}")]
    CorruptPayload(String),

    #[error("Failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Opaque locator of a published result
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultArtifactId(String);

impl ResultArtifactId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sequence number assigned when the artifact was published
    pub fn sequence(&self) -> Option<u64> {
        let (path, _) = self.parts()?;
        path.strip_prefix(PATH_PREFIX)?
            .strip_suffix(PATH_SUFFIX)?
            .parse()
            .ok()
    }

    fn parts(&self) -> Option<(&str, &str)> {
        self.0
            .strip_prefix(SCHEME)?
            .strip_prefix(':')?
            .split_once('?')
    }
}

impl fmt::Display for ResultArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResultArtifactId {
    type Err = ResultStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = ResultArtifactId(s.to_string());
        if id.sequence().is_none() {
            return Err(ResultStoreError::InvalidLocator(s.to_string()));
        }
        Ok(id)
    }
}

/// One published result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultArtifact {
    pub id: ResultArtifactId,
    pub lines: Vec<String>,
}

#[derive(Debug)]
pub struct ResultStore {
    next_sequence: AtomicU64,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            next_sequence: AtomicU64::new(1),
        }
    }

    /// Encode lines into a new locator
    ///
    /// Every call yields a fresh id, even for identical content.
    pub fn publish(&self, lines: &[String]) -> Result<ResultArtifactId, ResultStoreError> {
        let json = serde_json::to_string(lines)?;
        let payload = URL_SAFE_NO_PAD.encode(json.as_bytes());
        let sequence = self.next_sequence.fetch_add(1, Ordering::SeqCst);

        log::debug!(
            "Published result {} ({} lines, {} bytes)",
            sequence,
            lines.len(),
            payload.len()
        );

        Ok(ResultArtifactId(format!(
            "{}:{}{}{}?{}",
            SCHEME, PATH_PREFIX, sequence, PATH_SUFFIX, payload
        )))
    }

    /// Decode the lines a locator was published with
    pub fn resolve(&self, id: &ResultArtifactId) -> Result<Vec<String>, ResultStoreError> {
        let (_, payload) = id
            .parts()
            .ok_or_else(|| ResultStoreError::InvalidLocator(id.to_string()))?;

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .map_err(|e| ResultStoreError::CorruptPayload(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(|e| ResultStoreError::CorruptPayload(e.to_string()))
    }

    pub fn open(&self, id: &ResultArtifactId) -> Result<ResultArtifact, ResultStoreError> {
        Ok(ResultArtifact {
            id: id.clone(),
            lines: self.resolve(id)?,
        })
    }

    /// Render the artifact as a JSON array document
    ///
    /// Lines that are not valid JSON are embedded as strings.
    pub fn render(&self, id: &ResultArtifactId, pretty: bool) -> Result<String, ResultStoreError> {
        let values: Vec<Value> = self
            .resolve(id)?
            .into_iter()
            .map(|line| serde_json::from_str(&line).unwrap_or(Value::String(line)))
            .collect();

        let rendered = if pretty {
            serde_json::to_string_pretty(&values)?
        } else {
            serde_json::to_string(&values)?
        };
        Ok(rendered)
    }
}

#[cfg(test)]
#[path = "result_store_tests.rs"]
mod result_store_tests;
