use crate::config::RelayConfig;
use crate::error::RunnerError;
use crate::frame::FrameSink;
use crate::state::{TapPhase, TapState};

use super::runtime::{self, ClientIo};
use super::traits::ChildLauncher;
use super::types::{TapCommand, TapOutcome};

pub struct RunTapArgs<'a> {
    pub command: TapCommand,
    pub launcher: &'a dyn ChildLauncher,
    pub client: ClientIo,
    pub sink: FrameSink,
    pub relay: &'a RelayConfig,
    pub mirror_stderr: bool,
}

/// Launches the child, runs the relays until it exits, then flushes the frame log.
///
/// Only a spawn failure is returned as an error here; anything after data starts
/// flowing is absorbed by the runtime.
pub async fn run_tap(args: RunTapArgs<'_>) -> Result<TapOutcome, RunnerError> {
    let RunTapArgs {
        command,
        launcher,
        client,
        sink,
        relay,
        mirror_stderr,
    } = args;

    let mut state = TapState::new();
    let log = sink.log();
    log.marker(&format!("launching: {}", command.display()));

    let session = match launcher.spawn(&command).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error.kind = "runner.spawn", launcher = launcher.name(), error.message = %e);
            drop(log);
            sink.close().await;
            state.advance(TapPhase::Closed)?;
            return Err(RunnerError::Spawn(e.to_string()));
        }
    };
    tracing::debug!(launcher = launcher.name(), pid = ?session.pid(), "session started");

    let result = runtime::run_session_runtime(runtime::RunSessionRuntimeInput {
        session,
        client,
        frame_log: log.clone(),
        relay_cfg: relay,
        mirror_stderr,
        state: &mut state,
    })
    .await;

    if let Ok(outcome) = &result {
        log.marker(&format!("child exit: {}", outcome.exit_code));
    }
    drop(log);
    sink.close().await;

    if let Err(e) = state.advance(TapPhase::Closed) {
        tracing::warn!(error.kind = "runner.lifecycle", error.message = %e);
    }
    result
}
