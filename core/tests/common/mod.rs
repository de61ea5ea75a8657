#![allow(dead_code)]

use std::time::Duration;

use mcp_tap_core::config::{FrameLogConfig, RelayConfig};
use mcp_tap_core::error::RunnerError;
use mcp_tap_core::frame::{start_frame_log, LogTarget, PrettyPrinter};
use mcp_tap_core::runner::{run_tap, ClientIo, ProcessLauncher, RunTapArgs, TapCommand};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Debug, Clone)]
pub struct TapOpts {
    pub quiet: bool,
    pub pretty: bool,
    pub mirror_stderr: bool,
}

impl Default for TapOpts {
    fn default() -> Self {
        Self {
            quiet: false,
            pretty: false,
            mirror_stderr: true,
        }
    }
}

#[derive(Debug)]
pub struct TapRun {
    pub result: Result<i32, RunnerError>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Frame log contents, `None` when no log file was ever created.
    pub log: Option<String>,
}

impl TapRun {
    pub fn exit_code(&self) -> i32 {
        match &self.result {
            Ok(code) => *code,
            Err(e) => panic!("tap failed: {e}"),
        }
    }

    pub fn log(&self) -> &str {
        self.log.as_deref().expect("frame log was not written")
    }

    /// Payloads of records carrying `tag`, with stamp and tag stripped. A `\r` is kept.
    pub fn records(&self, tag: &str) -> Vec<String> {
        let needle = format!("] {tag}: ");
        self.log()
            .split('\n')
            .filter_map(|l| l.split_once(&needle).map(|(_, rest)| rest.to_string()))
            .collect()
    }
}

pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".into(), "-c".into(), script.into()]
}

/// Runs `argv` behind the tap, feeding `input` chunk by chunk, then closing client stdin.
pub async fn tap(argv: Vec<String>, input: Vec<Vec<u8>>, opts: TapOpts) -> TapRun {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("tap.log");
    let target = if opts.quiet {
        LogTarget::Suppressed
    } else {
        LogTarget::File(log_path.clone())
    };
    let sink = start_frame_log(
        &target,
        PrettyPrinter::new(opts.pretty, vec!["jsonrpc".into()]),
        FrameLogConfig::default().queue_capacity,
    )
    .await;

    let (mut in_wr, in_rd) = tokio::io::duplex(64 * 1024);
    let (out_wr, mut out_rd) = tokio::io::duplex(64 * 1024);
    let (err_wr, mut err_rd) = tokio::io::duplex(64 * 1024);

    let feeder = tokio::spawn(async move {
        for chunk in input {
            if in_wr.write_all(&chunk).await.is_err() {
                return;
            }
            let _ = in_wr.flush().await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    });
    let out_reader = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = out_rd.read_to_end(&mut buf).await;
        buf
    });
    let err_reader = tokio::spawn(async move {
        let mut buf = Vec::new();
        let _ = err_rd.read_to_end(&mut buf).await;
        buf
    });

    let command = TapCommand::from_argv(argv).expect("test command must not be empty");
    let launcher = ProcessLauncher::new();
    let relay = RelayConfig::default();
    let result = run_tap(RunTapArgs {
        command,
        launcher: &launcher,
        client: ClientIo {
            stdin: Box::new(in_rd),
            stdout: Box::new(out_wr),
            stderr: Box::new(err_wr),
        },
        sink,
        relay: &relay,
        mirror_stderr: opts.mirror_stderr,
    })
    .await
    .map(|outcome| outcome.exit_code);

    feeder.abort();
    let stdout = out_reader.await.unwrap();
    let stderr = err_reader.await.unwrap();
    let log = std::fs::read_to_string(&log_path).ok();

    TapRun {
        result,
        stdout,
        stderr,
        log,
    }
}
