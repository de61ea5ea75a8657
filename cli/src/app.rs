//! Assembly layer: merge config and flags, open the frame log, run the tap.
use mcp_tap_core::config::{self, TapConfig};
use mcp_tap_core::error::CliError;
use mcp_tap_core::frame::{start_frame_log, LogTarget, PrettyPrinter};
use mcp_tap_core::runner::{run_tap, ClientIo, ProcessLauncher, RunTapArgs, TapCommand};

use crate::commands::cli::Args;

pub fn resolve_config(args: &Args) -> Result<TapConfig, CliError> {
    let loaded = match &args.config {
        Some(path) => config::load_from(path),
        None => config::load_default(),
    };
    let mut cfg = loaded.map_err(|e| CliError::Config(e.to_string()))?;
    args.apply_to(&mut cfg);
    Ok(cfg)
}

#[tracing::instrument(name = "cli.run_app", skip_all, fields(program = %command.program))]
pub async fn run_app(command: TapCommand, cfg: &TapConfig) -> Result<i32, CliError> {
    let frame_cfg = &cfg.frame_log;
    let target = LogTarget::resolve(frame_cfg.logfile.as_deref(), frame_cfg.quiet);
    tracing::debug!(target_kind = ?target, pretty = frame_cfg.pretty, "frame log target");

    let sink = start_frame_log(
        &target,
        PrettyPrinter::new(frame_cfg.pretty, frame_cfg.markers.clone()),
        frame_cfg.queue_capacity,
    )
    .await;

    let launcher = ProcessLauncher::new();
    let outcome = run_tap(RunTapArgs {
        command,
        launcher: &launcher,
        client: ClientIo::stdio(),
        sink,
        relay: &cfg.relay,
        mirror_stderr: frame_cfg.mirror_child_stderr,
    })
    .await?;

    Ok(outcome.exit_code)
}
