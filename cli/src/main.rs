use clap::Parser;
use mcp_tap::app;
use mcp_tap::commands::cli;
use mcp_tap_core::config::LoggingConfig;
use mcp_tap_core::error::{CliError, RunnerError};
use mcp_tap_core::runner::TapCommand;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let mut log_guard = None;
    let exit = match real_main(&mut log_guard).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("tap: {e}");
            if matches!(e, CliError::Runner(RunnerError::Usage(_))) {
                eprintln!("{}", cli::USAGE);
            }
            exit_code_for_error(&e)
        }
    };

    // Flush buffered diagnostics; process::exit skips destructors.
    drop(log_guard);
    // The blocking stdin reader may still be parked; don't wait for runtime shutdown.
    std::process::exit(exit);
}

async fn real_main(log_guard: &mut Option<WorkerGuard>) -> Result<i32, CliError> {
    let mut args = cli::Args::parse();

    // Usage problems win over everything else, including config errors.
    let command = TapCommand::from_argv(std::mem::take(&mut args.command))?;

    let cfg = app::resolve_config(&args)?;
    *log_guard = init_tracing(&cfg.logging)?;
    tracing::debug!(command = %command.display(), "starting tap");

    app::run_app(command, &cfg).await
}

fn exit_code_for_error(e: &CliError) -> i32 {
    // 2: usage (no command)
    // 11: config error
    // 20: spawn / IO error
    // 50: internal/uncategorized
    match e {
        CliError::Config(_) => 11,
        CliError::Runner(re) => match re {
            RunnerError::Usage(_) => 2,
            RunnerError::Spawn(_) => 20,
            RunnerError::StreamIo { .. } => 20,
            RunnerError::Wait(_) => 50,
            RunnerError::Lifecycle(_) => 50,
        },
        CliError::Io(_) => 20,
        CliError::Anyhow(_) => 50,
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<Option<WorkerGuard>, CliError> {
    if !logging.enabled || (!logging.console && !logging.file) {
        return Ok(None);
    }

    let filter = match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => EnvFilter::from_default_env(),
        _ => EnvFilter::try_new(logging.level.clone())
            .map_err(|e| CliError::Config(format!("invalid logging.level: {e}")))?,
    };

    let mut guard = None;
    let mut maybe_writer = None;

    if logging.file {
        let dir = match logging
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            Some(d) => std::path::PathBuf::from(d),
            None => std::env::temp_dir().join("mcp-tap"),
        };

        std::fs::create_dir_all(&dir)?;
        let appender = tracing_appender::rolling::daily(dir, "mcp-tap.log");
        let (non_blocking, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        maybe_writer = Some(non_blocking);
    }

    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    let file_layer = maybe_writer.map(|w| {
        tracing_subscriber::fmt::layer()
            .with_writer(w)
            .with_ansi(false)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| CliError::Anyhow(anyhow::anyhow!("tracing init failed: {e}")))?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_error_exits_with_two() {
        let e = CliError::Runner(RunnerError::Usage("no command".into()));
        assert_eq!(exit_code_for_error(&e), 2);
    }

    #[test]
    fn startup_failures_map_to_distinct_codes() {
        assert_eq!(exit_code_for_error(&CliError::Config("bad".into())), 11);
        assert_eq!(
            exit_code_for_error(&CliError::Runner(RunnerError::Spawn("enoent".into()))),
            20
        );
    }

    #[test]
    fn disabled_logging_installs_nothing() {
        let cfg = LoggingConfig {
            enabled: false,
            ..LoggingConfig::default()
        };
        assert!(init_tracing(&cfg).unwrap().is_none());
    }
}
