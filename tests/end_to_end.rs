// tests/end_to_end.rs
//
// Real shell commands on both sides: managed commands through the supervisor
// and single blocks through `ShellSingleRunner`.

mod common;
use crate::common::{build_runtime, init_tracing};

use std::error::Error;
use std::time::Duration;

use barfeed::engine::RuntimeEvent;
use barfeed::exec::ShellSingleRunner;
use barfeed::sink::BarSink;
use barfeed_test_utils::builders::FeedConfigBuilder;
use barfeed_test_utils::recording_sink::RecordingSink;
use barfeed_test_utils::{wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn raw_continuous_and_single_blocks_compose() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let marker = dir.path().join("go");
    let continuous = format!(
        "echo B; while [ ! -f '{}' ]; do sleep 0.05; done; echo B2; exec sleep 30",
        marker.display()
    );

    let cfg = FeedConfigBuilder::new()
        .raw("A")
        .continuous(&continuous)
        .single("echo C", &[])
        .build();
    let sink = RecordingSink::new();
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), ShellSingleRunner);

    let handle = tokio::spawn(runtime.run());

    // The startup line is composed before any managed command runs.
    assert!(wait_until(Duration::from_secs(3), || !sink.lines().is_empty()).await);
    assert_eq!(sink.lines()[0], "AC\n");

    assert!(wait_until(Duration::from_secs(3), || sink.lines().contains(&"ABC\n".to_string())).await);

    std::fs::write(&marker, b"")?;
    assert!(wait_until(Duration::from_secs(3), || sink.lines().contains(&"AB2C\n".to_string())).await);

    let lines = sink.lines();
    let abc = lines.iter().position(|l| l == "ABC\n").unwrap();
    let ab2c = lines.iter().position(|l| l == "AB2C\n").unwrap();
    assert!(abc < ab2c);
    assert!(lines.iter().all(|l| l.starts_with('A') && l.ends_with("C\n")));

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn status_lines_reach_a_real_bar_process() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let out = dir.path().join("bar.out");
    let script = format!("cat >> '{}'", out.display());

    let cfg = FeedConfigBuilder::new()
        .raw("A")
        .continuous("echo B; exec sleep 30")
        .single("echo C", &[])
        .bar(&["sh", "-c", script.as_str()])
        .build();
    let (runtime, tx) = build_runtime(&cfg, BarSink::from_config(&cfg), ShellSingleRunner);

    let handle = tokio::spawn(runtime.run());

    let read = || std::fs::read_to_string(&out).unwrap_or_default();
    assert!(wait_until(Duration::from_secs(3), || read().lines().any(|l| l == "ABC")).await);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    let written = read();
    assert!(written.starts_with("AC\n"), "{written:?}");
    assert!(written.ends_with('\n'));
    assert!(written.lines().all(|l| l == "AC" || l == "ABC"), "{written:?}");
    Ok(())
}

#[tokio::test]
async fn exiting_command_is_respawned_and_text_survives() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new().raw("A").continuous("echo X").build();
    let sink = RecordingSink::new();
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), ShellSingleRunner);

    let handle = tokio::spawn(runtime.run());

    // Every respawn prints X again, so many passes happen quickly.
    assert!(wait_until(Duration::from_secs(5), || sink.lines().len() >= 6).await);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    let lines = sink.lines();
    assert_eq!(lines[0], "A\n");
    let first_x = lines.iter().position(|l| l == "AX\n").unwrap();
    assert!(
        lines[first_x..].iter().all(|l| l == "AX\n"),
        "restart must not clear the block: {lines:?}"
    );

    Ok(())
}

#[tokio::test]
async fn shutdown_terminates_long_running_children() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new()
        .continuous("echo up; exec sleep 60")
        .single("echo s", &["exec sleep 60"])
        .build();
    let sink = RecordingSink::new();
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), ShellSingleRunner);

    let handle = tokio::spawn(runtime.run());
    assert!(wait_until(Duration::from_secs(3), || sink.lines().contains(&"ups\n".to_string())).await);

    tx.send(RuntimeEvent::ShutdownRequested).await?;

    // Waiting for 60s sleepers would blow the timeout; SIGTERM ends them.
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn single_block_with_empty_output_is_empty() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new().raw("<").single("true", &[]).raw(">").build();
    let sink = RecordingSink::new();
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), ShellSingleRunner);

    let handle = tokio::spawn(runtime.run());
    assert!(wait_until(Duration::from_secs(3), || !sink.lines().is_empty()).await);
    assert_eq!(sink.lines()[0], "<>\n");

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}
