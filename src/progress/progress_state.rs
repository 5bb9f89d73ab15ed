//! Progress indicator state
//!
//! A fixed-budget countdown: `Active` until `elapsed_ticks` reaches
//! `budget_ticks` or something disposes it, then `Disposed` for good.

const DONE_GLYPH: char = '⣀';
const LEFT_GLYPH: char = '⣿';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    Active,
    Disposed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub query: String,
    pub elapsed_ticks: u32,
    pub budget_ticks: u32,
    pub label: String,
    pub phase: ProgressPhase,
}

impl ProgressState {
    pub fn new(query: &str, budget_ticks: u32) -> Self {
        let mut state = Self {
            query: query.to_string(),
            elapsed_ticks: 0,
            budget_ticks,
            label: String::new(),
            phase: ProgressPhase::Active,
        };
        state.label = state.render_label();
        if budget_ticks == 0 {
            state.dispose();
        }
        state
    }

    pub fn is_active(&self) -> bool {
        self.phase == ProgressPhase::Active
    }

    pub fn is_disposed(&self) -> bool {
        self.phase == ProgressPhase::Disposed
    }

    /// Advance one tick; disposes once the budget is spent
    ///
    /// Returns false if the state was already disposed.
    pub fn tick(&mut self) -> bool {
        if self.is_disposed() {
            return false;
        }

        self.elapsed_ticks += 1;
        self.label = self.render_label();
        if self.elapsed_ticks >= self.budget_ticks {
            self.dispose();
        }
        true
    }

    pub fn dispose(&mut self) {
        self.phase = ProgressPhase::Disposed;
    }

    fn render_label(&self) -> String {
        let done = self.elapsed_ticks.min(self.budget_ticks) as usize;
        let left = self.budget_ticks as usize - done;

        let mut label = format!("JSON path query: \"{}\"  ", self.query);
        label.extend(std::iter::repeat_n(DONE_GLYPH, done));
        label.extend(std::iter::repeat_n(LEFT_GLYPH, left));
        label
    }
}

#[cfg(test)]
#[path = "progress_state_tests.rs"]
mod progress_state_tests;
