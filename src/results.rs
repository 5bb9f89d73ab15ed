//! Result publishing module
//!
//! Turns the matches of one successful query into an immutable,
//! addressable artifact that a display layer can open read-only.

mod result_store;

pub use result_store::{ResultArtifact, ResultArtifactId, ResultStore, ResultStoreError, SCHEME};
