pub mod loader;

pub use loader::{DocumentOrigin, LoadedDocument, load_document};
