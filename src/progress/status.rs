//! Single-line status display

use std::io::{IsTerminal, Write};

/// Where the progress label is drawn
pub trait StatusSurface: Send + Sync {
    /// Replace the visible status text
    fn show(&self, text: &str);
    /// Remove the indicator
    fn clear(&self);
}

/// Draws the status line on stderr, only when stderr is a terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrStatus;

impl StatusSurface for StderrStatus {
    fn show(&self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        if stderr.is_terminal() {
            let _ = write!(stderr, "\r\x1b[2K{}", text);
            let _ = stderr.flush();
        }
    }

    fn clear(&self) {
        let mut stderr = std::io::stderr().lock();
        if stderr.is_terminal() {
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatus;

impl StatusSurface for NoStatus {
    fn show(&self, _text: &str) {}

    fn clear(&self) {}
}
