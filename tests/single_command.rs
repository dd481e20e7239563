// tests/single_command.rs

use std::error::Error;

use barfeed::exec::run_single;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn first_line_without_newline() -> TestResult {
    assert_eq!(run_single("echo hello").await?, "hello");
    assert_eq!(run_single("printf 'x\\ny\\nz\\n'").await?, "x");
    assert_eq!(run_single("printf 'no newline'").await?, "no newline");
    Ok(())
}

#[tokio::test]
async fn no_output_gives_empty_text() -> TestResult {
    assert_eq!(run_single("true").await?, "");
    assert_eq!(run_single("exit 3").await?, "");
    Ok(())
}

#[tokio::test]
async fn large_output_does_not_block() -> TestResult {
    // Far more than a pipe buffer.
    let text = run_single("echo first; yes filler | head -c 1000000").await?;
    assert_eq!(text, "first");
    Ok(())
}

#[tokio::test]
async fn background_process_holding_stdout_does_not_delay_the_result() -> TestResult {
    let started = std::time::Instant::now();
    let text = run_single("sleep 3 & echo C").await?;
    assert_eq!(text, "C");
    assert!(
        started.elapsed() < std::time::Duration::from_millis(1500),
        "took {:?}",
        started.elapsed()
    );
    Ok(())
}

#[tokio::test]
async fn line_written_just_before_exit_is_kept() -> TestResult {
    for _ in 0..20 {
        assert_eq!(run_single("printf 'last'; printf ' word\\n'").await?, "last word");
    }
    Ok(())
}
