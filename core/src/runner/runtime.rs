//! Runner runtime: relays, child-exit wait, drain/cancel and exit code.
use std::time::{Duration, Instant};

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinError;

use crate::config::RelayConfig;
use crate::error::RunnerError;
use crate::frame::FrameLog;
use crate::state::{TapPhase, TapState};

use super::io_pump::{self, RelayTask};
use super::traits::ChildSession;
use super::types::{RelayBytes, TapOutcome};

/// The tap's own end of the three streams.
pub struct ClientIo {
    pub stdin: Box<dyn AsyncRead + Unpin + Send>,
    pub stdout: Box<dyn AsyncWrite + Unpin + Send>,
    pub stderr: Box<dyn AsyncWrite + Unpin + Send>,
}

impl ClientIo {
    pub fn stdio() -> Self {
        Self {
            stdin: Box::new(tokio::io::stdin()),
            stdout: Box::new(tokio::io::stdout()),
            stderr: Box::new(tokio::io::stderr()),
        }
    }
}

pub struct RunSessionRuntimeInput<'a> {
    pub session: Box<dyn ChildSession>,
    pub client: ClientIo,
    pub frame_log: FrameLog,
    pub relay_cfg: &'a RelayConfig,
    pub mirror_stderr: bool,
    pub state: &'a mut TapState,
}

pub async fn run_session_runtime(
    input: RunSessionRuntimeInput<'_>,
) -> Result<TapOutcome, RunnerError> {
    let RunSessionRuntimeInput {
        mut session,
        client,
        frame_log,
        relay_cfg,
        mirror_stderr,
        state,
    } = input;

    let child_stdin = session
        .stdin()
        .ok_or_else(|| RunnerError::Spawn("no stdin".into()))?;
    let child_stdout = session
        .stdout()
        .ok_or_else(|| RunnerError::Spawn("no stdout".into()))?;
    let child_stderr = session
        .stderr()
        .ok_or_else(|| RunnerError::Spawn("no stderr".into()))?;

    let started_at = Instant::now();
    let chunk = relay_cfg.chunk_size;

    let in_task =
        io_pump::relay_client_to_server(client.stdin, child_stdin, frame_log.clone(), chunk);
    let out_task =
        io_pump::relay_server_to_client(child_stdout, client.stdout, frame_log.clone(), chunk);
    let err_task = io_pump::relay_server_stderr(
        child_stderr,
        mirror_stderr.then_some(client.stderr),
        frame_log,
        chunk,
    );
    state.advance(TapPhase::Running)?;

    let status = session.wait().await;
    state.advance(TapPhase::Draining)?;

    // Nobody is left to consume client input.
    in_task.abort();
    let client_to_server = settle(in_task.await, "stdin");

    // Output the child wrote right before exiting may still be in the pipes.
    let deadline = tokio::time::Instant::now() + Duration::from_millis(relay_cfg.drain_grace_ms);
    let (server_to_client, server_stderr) = tokio::join!(
        drain_relay(out_task, deadline, "stdout"),
        drain_relay(err_task, deadline, "stderr"),
    );
    let bytes = RelayBytes {
        client_to_server,
        server_to_client,
        server_stderr,
    };

    let outcome = status?;
    let duration_ms = started_at.elapsed().as_millis() as u64;
    tracing::info!(
        exit_code = outcome.exit_code,
        duration_ms = duration_ms,
        bytes = ?bytes,
        "child exited"
    );

    Ok(TapOutcome {
        exit_code: outcome.exit_code,
        duration_ms,
        bytes,
    })
}

async fn drain_relay(
    mut task: RelayTask,
    deadline: tokio::time::Instant,
    label: &'static str,
) -> Option<u64> {
    let joined = match tokio::time::timeout_at(deadline, &mut task).await {
        Ok(joined) => joined,
        Err(_) => {
            tracing::debug!(relay = label, "relay still blocked after drain grace, cancelling");
            task.abort();
            task.await
        }
    };
    settle(joined, label)
}

/// Relay outcomes after data has flowed are absorbed; cancellation is expected.
fn settle(joined: Result<Result<u64, RunnerError>, JoinError>, label: &'static str) -> Option<u64> {
    match joined {
        Ok(Ok(bytes)) => {
            tracing::debug!(relay = label, bytes = bytes, "relay done");
            Some(bytes)
        }
        Ok(Err(e)) => {
            tracing::debug!(error.kind = "relay.stream_io", relay = label, error.message = %e);
            None
        }
        Err(e) if e.is_cancelled() => None,
        Err(e) => {
            tracing::warn!(error.kind = "relay.panicked", relay = label, error.message = %e);
            None
        }
    }
}
