//! Progress indicator for running queries
//!
//! Shows the query text next to a glyph bar that fills once per tick and
//! disappears when its fixed budget is spent, whether or not the query has
//! finished. The owner of a reporter can remove it earlier.

mod progress_state;
mod reporter;
mod status;

pub use progress_state::{ProgressPhase, ProgressState};
pub use reporter::{ProgressReporter, ProgressSettings};
pub use status::{NoStatus, StatusSurface, StderrStatus};
