//! Self-ticking progress reporter
//!
//! Each reporter runs as its own tokio task. It ticks on a fixed interval
//! until its budget is spent or its dispose token fires, whichever comes
//! first, and never looks at the query it describes.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use super::progress_state::ProgressState;
use super::status::StatusSurface;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSettings {
    pub budget_ticks: u32,
    pub tick_interval: Duration,
}

impl Default for ProgressSettings {
    fn default() -> Self {
        Self {
            budget_ticks: 9,
            tick_interval: Duration::from_secs(1),
        }
    }
}

/// Handle to a running progress indicator
///
/// Dropping the handle does not stop the indicator; it keeps ticking until
/// its budget runs out.
#[derive(Debug)]
pub struct ProgressReporter {
    state_rx: watch::Receiver<ProgressState>,
    dispose_token: CancellationToken,
    task: JoinHandle<()>,
}

impl ProgressReporter {
    /// Show the indicator and start ticking
    ///
    /// Must be called from within a tokio runtime. Cancelling `dispose_token`
    /// removes the indicator early.
    pub fn start(
        query: &str,
        settings: ProgressSettings,
        status: Arc<dyn StatusSurface>,
        dispose_token: CancellationToken,
    ) -> Self {
        let state = ProgressState::new(query, settings.budget_ticks);
        let (state_tx, state_rx) = watch::channel(state.clone());

        let task = tokio::spawn(tick_loop(
            state,
            state_tx,
            status,
            settings.tick_interval,
            dispose_token.clone(),
        ));

        Self {
            state_rx,
            dispose_token,
            task,
        }
    }

    pub fn state(&self) -> ProgressState {
        self.state_rx.borrow().clone()
    }

    pub fn is_disposed(&self) -> bool {
        self.state_rx.borrow().is_disposed()
    }

    /// Remove the indicator now; no-op if already disposed
    pub fn dispose(&self) {
        self.dispose_token.cancel();
    }

    /// Wait until the indicator is gone, by timeout or disposal
    pub async fn disposed(&self) -> ProgressState {
        let mut state_rx = self.state_rx.clone();
        if let Ok(state) = state_rx.wait_for(ProgressState::is_disposed).await {
            return state.clone();
        }
        // Task gone without publishing a disposed state (runtime shut down)
        let mut state = state_rx.borrow().clone();
        state.dispose();
        state
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn tick_loop(
    mut state: ProgressState,
    state_tx: watch::Sender<ProgressState>,
    status: Arc<dyn StatusSurface>,
    tick_interval: Duration,
    dispose_token: CancellationToken,
) {
    if state.is_active() {
        status.show(&state.label);

        let mut ticker = tokio::time::interval_at(Instant::now() + tick_interval, tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = dispose_token.cancelled() => {
                    log::debug!("Progress for {:?} disposed after {} ticks", state.query, state.elapsed_ticks);
                    state.dispose();
                    break;
                }
                _ = ticker.tick() => {
                    state.tick();
                    if state.is_disposed() {
                        log::debug!("Progress for {:?} ran out its budget", state.query);
                        break;
                    }
                    status.show(&state.label);
                    state_tx.send_replace(state.clone());
                }
            }
        }
    }

    status.clear();
    state_tx.send_replace(state);
}

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod reporter_tests;
