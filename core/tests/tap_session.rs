#![cfg(unix)]

mod common;

use common::{sh, tap, TapOpts};
use mcp_tap_core::error::RunnerError;
use pretty_assertions::assert_eq;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn bytes_pass_through_unmodified_both_ways() {
    let input: Vec<Vec<u8>> = vec![
        b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"init".to_vec(),
        b"ialize\"}\r\n".to_vec(),
        vec![0xff, 0x00, b'\n', 0xe2, 0x82],
        vec![0xac, b'\n'],
        b"no newline at the end".to_vec(),
    ];
    let expected = input.concat();

    let run = tap(vec!["cat".into()], input, TapOpts::default()).await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stdout, expected);

    let sent = run.records("C -> S");
    assert_eq!(
        sent[..3].to_vec(),
        vec![
            "{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"initialize\"}\r".to_string(),
            "\u{FFFD}\u{0}".to_string(),
            "€".to_string(),
        ]
    );
    // The trailing fragment is flushed without a newline of its own.
    assert!(sent[3].starts_with("no newline at the end"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn line_split_across_reads_is_logged_once() {
    let input = vec![b"{\"a".to_vec(), b":1".to_vec(), b"}\n".to_vec()];
    let run = tap(vec!["cat".into()], input, TapOpts::default()).await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.records("C -> S"), vec![r#"{"a":1}"#.to_string()]);
    assert_eq!(run.records("S -> C"), vec![r#"{"a":1}"#.to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn child_exit_code_becomes_tap_exit_code() {
    let run = tap(sh("exit 3"), vec![], TapOpts::default()).await;

    assert_eq!(run.exit_code(), 3);
    let log = run.log();
    assert!(log.contains("] launching: sh -c exit 3\n"), "log: {log}");
    assert!(log.trim_end().ends_with("] child exit: 3"), "log: {log}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn killed_child_reports_signal_sentinel() {
    let run = tap(sh("kill -9 $$"), vec![], TapOpts::default()).await;
    assert_eq!(run.exit_code(), 137);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn trailing_partial_output_is_logged_once() {
    // Built at runtime so the launching marker does not contain the text itself.
    let run = tap(
        sh("printf 'partial-%s' no-newline"),
        vec![],
        TapOpts::default(),
    )
    .await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stdout, b"partial-no-newline");
    assert_eq!(run.log().matches("partial-no-newline").count(), 1);
    // No newline is invented; the next record starts right after it.
    assert!(run.log().contains("S -> C: partial-no-newline["));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn quiet_mode_writes_no_log_and_still_forwards() {
    let opts = TapOpts {
        quiet: true,
        ..TapOpts::default()
    };
    let run = tap(vec!["cat".into()], vec![b"ping\n".to_vec()], opts).await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stdout, b"ping\n");
    assert!(run.log.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn child_stderr_is_mirrored_and_logged() {
    let run = tap(sh("echo oops >&2"), vec![], TapOpts::default()).await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stderr, b"oops\n");
    assert_eq!(run.records("S-STDERR"), vec!["oops".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unmirrored_stderr_is_still_logged() {
    let opts = TapOpts {
        mirror_stderr: false,
        ..TapOpts::default()
    };
    let run = tap(sh("echo oops >&2"), vec![], opts).await;

    assert_eq!(run.exit_code(), 0);
    assert!(run.stderr.is_empty());
    assert_eq!(run.records("S-STDERR"), vec!["oops".to_string()]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn pretty_mode_indents_frames_but_forwards_raw() {
    let frame = r#"{"jsonrpc":"2.0","id":2,"result":{"tools":[]}}"#;
    let opts = TapOpts {
        pretty: true,
        ..TapOpts::default()
    };
    let run = tap(
        vec!["cat".into()],
        vec![format!("{frame}\nnot json\n").into_bytes()],
        opts,
    )
    .await;

    assert_eq!(run.exit_code(), 0);
    assert_eq!(run.stdout, format!("{frame}\nnot json\n").into_bytes());

    let log = run.log();
    assert!(log.contains("C -> S: {\n  \"jsonrpc\": \"2.0\",\n  \"id\": 2,"));
    assert!(log.contains("C -> S: not json\n"));

    let start = log.find("S -> C: {").unwrap() + "S -> C: ".len();
    let end = start + log[start..].find("\n}\n").unwrap() + 2;
    let reparsed: serde_json::Value = serde_json::from_str(&log[start..end]).unwrap();
    assert_eq!(serde_json::to_string(&reparsed).unwrap(), frame);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn spawn_failure_is_fatal_and_logged() {
    let run = tap(
        vec!["/nonexistent/mcp-tap-test-server".into()],
        vec![],
        TapOpts::default(),
    )
    .await;

    assert!(matches!(run.result, Err(RunnerError::Spawn(_))));
    let log = run.log();
    assert!(log.contains("launching: /nonexistent/mcp-tap-test-server"));
    assert!(!log.contains("child exit"));
}
