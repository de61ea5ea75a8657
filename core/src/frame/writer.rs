use std::path::PathBuf;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::{FrameLog, PrettyPrinter};

/// Where frame records end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Suppressed,
}

impl LogTarget {
    /// A logfile always wins; otherwise stderr unless quiet.
    pub fn resolve(logfile: Option<&str>, quiet: bool) -> Self {
        match logfile.map(str::trim).filter(|s| !s.is_empty()) {
            Some(path) => LogTarget::File(PathBuf::from(path)),
            None if quiet => LogTarget::Suppressed,
            None => LogTarget::Stderr,
        }
    }
}

/// Owns the writer task behind a [`FrameLog`].
pub struct FrameSink {
    log: FrameLog,
    writer: Option<JoinHandle<()>>,
}

impl FrameSink {
    /// Spawns the writer task behind a queue of `capacity` records.
    /// `None` yields a suppressed sink with no task at all.
    pub fn from_writer(
        writer: Option<Box<dyn AsyncWrite + Unpin + Send>>,
        pretty: PrettyPrinter,
        capacity: usize,
    ) -> Self {
        let Some(writer) = writer else {
            return Self {
                log: FrameLog::new(None, pretty),
                writer: None,
            };
        };

        let (tx, rx) = mpsc::channel::<String>(capacity.max(1));
        let task = tokio::spawn(drain_records(rx, writer));
        Self {
            log: FrameLog::new(Some(tx), pretty),
            writer: Some(task),
        }
    }

    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }

    /// Flushes and releases the sink once every outstanding handle is gone.
    pub async fn close(self) {
        let Self { log, writer } = self;
        drop(log);
        if let Some(task) = writer {
            if let Err(e) = task.await {
                tracing::debug!(error.kind = "frame_log.writer_join", error.message = %e);
            }
        }
    }
}

pub async fn start_frame_log(
    target: &LogTarget,
    pretty: PrettyPrinter,
    capacity: usize,
) -> FrameSink {
    let writer: Option<Box<dyn AsyncWrite + Unpin + Send>> = match target {
        LogTarget::File(path) => match tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
        {
            Ok(f) => Some(Box::new(f)),
            Err(e) => {
                tracing::warn!(
                    error.kind = "frame_log.open_failed",
                    path = %path.display(),
                    error.message = %e,
                    "frame log disabled"
                );
                None
            }
        },
        LogTarget::Stderr => Some(Box::new(tokio::io::stderr())),
        LogTarget::Suppressed => None,
    };
    FrameSink::from_writer(writer, pretty, capacity)
}

async fn drain_records(
    mut rx: mpsc::Receiver<String>,
    mut writer: Box<dyn AsyncWrite + Unpin + Send>,
) {
    while let Some(record) = rx.recv().await {
        let result = append(writer.as_mut(), record.as_bytes()).await;
        if let Err(e) = result {
            tracing::debug!(
                error.kind = "frame_log.write_failed",
                error.message = %e,
                bytes = record.len()
            );
        }
    }
    let _ = writer.flush().await;
}

async fn append(
    writer: &mut (dyn AsyncWrite + Unpin + Send),
    bytes: &[u8],
) -> std::io::Result<()> {
    writer.write_all(bytes).await?;
    writer.flush().await
}
