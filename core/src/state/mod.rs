//! Lifecycle state tracking for a tap session.

mod transitions;
mod types;

pub use transitions::{StateTransition, TransitionError};
pub use types::TapPhase;

/// Current phase of one tap run. Only forward moves are accepted.
#[derive(Debug)]
pub struct TapState {
    phase: TapPhase,
}

impl TapState {
    pub fn new() -> Self {
        Self {
            phase: TapPhase::Starting,
        }
    }

    pub fn phase(&self) -> TapPhase {
        self.phase
    }

    pub fn advance(&mut self, to: TapPhase) -> Result<(), TransitionError> {
        StateTransition::validate(self.phase, to)?;
        tracing::debug!(from = self.phase.as_str(), to = to.as_str(), "tap phase");
        self.phase = to;
        Ok(())
    }
}

impl Default for TapState {
    fn default() -> Self {
        Self::new()
    }
}
