// tests/runtime_scripted.rs
//
// Runtime loop with a recording sink and a scripted single runner.

mod common;
use crate::common::{build_runtime, init_tracing};

use std::error::Error;
use std::time::Duration;

use barfeed::engine::RuntimeEvent;
use barfeed_test_utils::builders::FeedConfigBuilder;
use barfeed_test_utils::recording_sink::RecordingSink;
use barfeed_test_utils::scripted_runner::ScriptedRunner;
use barfeed_test_utils::{wait_until, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn startup_publishes_once_and_shutdown_stops_publishing() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new().raw("A").single("date", &[]).raw("Z").build();
    let sink = RecordingSink::new();
    let runner = ScriptedRunner::with_outputs(&["12:00"]);
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), runner.clone());

    let handle = tokio::spawn(runtime.run());

    assert!(wait_until(Duration::from_secs(2), || !sink.lines().is_empty()).await);
    assert_eq!(sink.lines(), vec!["A12:00Z\n".to_string()]);
    assert_eq!(runner.calls(), vec!["date".to_string()]);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    assert!(sink.is_shut_down());
    assert_eq!(sink.lines().len(), 1, "shutdown must not publish");

    Ok(())
}

#[tokio::test]
async fn timer_events_are_rate_limited() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new().single("date", &[]).build();
    let sink = RecordingSink::new();
    let runner = ScriptedRunner::with_outputs(&["first", "second"]);
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), runner.clone());

    let handle = tokio::spawn(runtime.run());
    assert!(wait_until(Duration::from_secs(2), || sink.lines().len() == 1).await);

    // Well within the 500ms minimum interval of the startup refresh.
    tx.send(RuntimeEvent::TimerFired).await?;
    assert!(wait_until(Duration::from_secs(2), || sink.lines().len() == 2).await);

    assert_eq!(runner.calls().len(), 1);
    assert_eq!(sink.lines(), vec!["first\n".to_string(), "first\n".to_string()]);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn forced_refresh_fires_periodically() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new()
        .single("date", &[])
        .min_interval(Duration::from_millis(10))
        .force_interval(Duration::from_millis(100))
        .build();
    let sink = RecordingSink::new();
    let runner = ScriptedRunner::new();
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), runner.clone());

    let handle = tokio::spawn(runtime.run());

    assert!(wait_until(Duration::from_secs(3), || runner.calls().len() >= 4).await);
    assert!(sink.lines().iter().all(|l| l == "date\n"));

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}

#[tokio::test]
async fn trigger_command_lines_refresh_the_single_block() -> TestResult {
    init_tracing();

    let cfg = FeedConfigBuilder::new()
        .raw("[")
        .single("volume", &["echo changed; echo changed-again; exec sleep 30"])
        .raw("]")
        .min_interval(Duration::ZERO)
        .build();
    let sink = RecordingSink::new();
    let runner = ScriptedRunner::with_outputs(&["10%", "20%", "30%"]);
    let (runtime, tx) = build_runtime(&cfg, sink.clone(), runner.clone());

    let handle = tokio::spawn(runtime.run());

    assert!(
        wait_until(Duration::from_secs(3), || {
            sink.lines().last().map(String::as_str) == Some("[30%]\n")
        })
        .await
    );
    assert_eq!(sink.lines()[0], "[10%]\n");
    assert_eq!(runner.calls().len(), 3);

    tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;
    Ok(())
}
