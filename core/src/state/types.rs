//! Tap lifecycle phases.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TapPhase {
    /// Parsing the command and spawning the child.
    Starting,
    /// Relays active.
    Running,
    /// Child exited; relays draining or being cancelled.
    Draining,
    /// Sink flushed; the process is about to exit.
    Closed,
}

impl TapPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            TapPhase::Starting => "starting",
            TapPhase::Running => "running",
            TapPhase::Draining => "draining",
            TapPhase::Closed => "closed",
        }
    }
}
