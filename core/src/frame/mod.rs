//! Frame log: timestamped, direction-tagged copies of tapped traffic.
//!
//! Records are formatted on the relay side and appended by a single writer
//! task, so a slow or failing sink never holds up forwarding. The queue
//! between them is bounded; when it is full the record is dropped.
mod pretty;
mod writer;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::util::time::clock_stamp;

pub use pretty::PrettyPrinter;
pub use writer::{start_frame_log, FrameSink, LogTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    ClientToServer,
    ServerToClient,
    ServerStderr,
}

impl Direction {
    pub fn tag(self) -> &'static str {
        match self {
            Direction::ClientToServer => "C -> S",
            Direction::ServerToClient => "S -> C",
            Direction::ServerStderr => "S-STDERR",
        }
    }
}

/// Cloneable handle relays use to append records.
#[derive(Clone)]
pub struct FrameLog {
    tx: Option<mpsc::Sender<String>>,
    pretty: Arc<PrettyPrinter>,
}

impl FrameLog {
    pub(crate) fn new(tx: Option<mpsc::Sender<String>>, pretty: PrettyPrinter) -> Self {
        Self {
            tx,
            pretty: Arc::new(pretty),
        }
    }

    /// A handle that drops everything.
    pub fn disabled() -> Self {
        Self::new(None, PrettyPrinter::disabled())
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Logs one completed line; the pretty transform applies.
    pub fn line(&self, direction: Direction, line: &str) {
        if !self.is_enabled() {
            return;
        }
        let rendered = self.pretty.render(line);
        if rendered.ends_with('\n') {
            self.record(direction, &rendered);
        } else {
            self.record(direction, &format!("{rendered}\n"));
        }
    }

    /// Logs a trailing fragment left at end of stream. No newline is added.
    pub fn partial(&self, direction: Direction, rest: &str) {
        if !self.is_enabled() {
            return;
        }
        let rendered = self.pretty.render(rest);
        self.record(direction, &rendered);
    }

    /// Appends `[ts] TAG: payload` with the payload taken verbatim.
    pub fn record(&self, direction: Direction, payload: &str) {
        self.send(format!("[{}] {}: {}", clock_stamp(), direction.tag(), payload));
    }

    /// Lifecycle marker such as `launching: ...` or `child exit: ...`.
    pub fn marker(&self, text: &str) {
        self.send(format!("[{}] {}\n", clock_stamp(), text));
    }

    fn send(&self, record: String) {
        let Some(tx) = self.tx.as_ref() else {
            return;
        };
        match tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                tracing::debug!(error.kind = "frame_log.queue_full", bytes = record.len());
            }
            Err(TrySendError::Closed(record)) => {
                tracing::debug!(error.kind = "frame_log.closed", bytes = record.len());
            }
        }
    }
}
