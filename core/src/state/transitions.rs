//! Lifecycle transition rules.

use super::types::TapPhase;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: TapPhase, to: TapPhase },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: TapPhase },
}

pub struct StateTransition;

impl StateTransition {
    pub fn validate(from: TapPhase, to: TapPhase) -> Result<(), TransitionError> {
        if Self::is_terminal(from) {
            return Err(TransitionError::FromTerminalState { state: from });
        }

        let is_valid = matches!(
            (from, to),
            (TapPhase::Starting, TapPhase::Running)
                | (TapPhase::Running, TapPhase::Draining)
                | (TapPhase::Draining, TapPhase::Closed)
                // spawn failure or missing command
                | (TapPhase::Starting, TapPhase::Closed)
        );

        if is_valid {
            Ok(())
        } else {
            Err(TransitionError::InvalidTransition { from, to })
        }
    }

    pub fn is_terminal(phase: TapPhase) -> bool {
        matches!(phase, TapPhase::Closed)
    }
}
