//! Document Loader Module
//!
//! Acquires the JSON document a query runs against. Filesystem documents must
//! carry a `.json` extension, checked before the file is touched; large
//! documents load normally but come back with a warning for the user.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use crate::error::QueryError;

/// Documents above this many bytes get a warning
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 3_000_000;

pub const LARGE_FILE_WARNING: &str =
    "Warning: this is a large file! Your JSON path query may take a long time to run.";

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOrigin {
    File(PathBuf),
    Stdin,
}

impl DocumentOrigin {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => DocumentOrigin::File(path),
            None => DocumentOrigin::Stdin,
        }
    }
}

/// A parsed document ready to be queried
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Arc<Value>,
    pub size_bytes: u64,
    pub warning: Option<String>,
}

/// Check a filesystem document before reading it
///
/// Returns the large-file warning, if any.
pub fn check_file(path: &Path, large_file_threshold: u64) -> Result<Option<String>, QueryError> {
    if !has_json_extension(path) {
        return Err(QueryError::InvalidSourceFormat(path.to_path_buf()));
    }

    let size_bytes = fs::metadata(path)?.len();
    Ok(size_warning(size_bytes, large_file_threshold))
}

/// Load and parse a document
pub fn load_document(
    origin: &DocumentOrigin,
    large_file_threshold: u64,
) -> Result<LoadedDocument, QueryError> {
    let (contents, warning) = match origin {
        DocumentOrigin::File(path) => {
            let warning = check_file(path, large_file_threshold)?;
            (fs::read_to_string(path)?, warning)
        }
        DocumentOrigin::Stdin => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            let warning = size_warning(buffer.len() as u64, large_file_threshold);
            (buffer, warning)
        }
    };

    if let Some(warning) = &warning {
        log::debug!("{:?}: {}", origin, warning);
    }

    parse_document(&contents, warning)
}

/// Parse already acquired text
pub fn parse_document(contents: &str, warning: Option<String>) -> Result<LoadedDocument, QueryError> {
    let document: Value =
        serde_json::from_str(contents).map_err(|e| QueryError::ParseFailure(e.to_string()))?;

    Ok(LoadedDocument {
        document: Arc::new(document),
        size_bytes: contents.len() as u64,
        warning,
    })
}

fn has_json_extension(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(".json"))
}

fn size_warning(size_bytes: u64, large_file_threshold: u64) -> Option<String> {
    (size_bytes > large_file_threshold).then(|| LARGE_FILE_WARNING.to_string())
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod loader_tests;
