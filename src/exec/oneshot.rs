// src/exec/oneshot.rs

//! Synchronous evaluation of single-block commands.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::anyhow;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::blocks::strip_newline;
use crate::errors::{FeedError, Result};
use crate::exec::backend::SingleRunner;
use crate::exec::launcher::shell_command;

/// Runs the command through `/bin/sh -c` and waits for it.
///
/// There is no timeout: a command that never exits stalls the caller.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellSingleRunner;

impl SingleRunner for ShellSingleRunner {
    fn run<'a>(
        &'a mut self,
        cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>> {
        Box::pin(run_single(cmd))
    }
}

/// Spawn `cmd`, wait for it to exit and return its first output line.
///
/// Stdout is drained while waiting so a chatty command cannot block on a full
/// pipe. Once the shell has exited only the rest of the first line is read;
/// anything the command left running in the background may keep the pipe
/// open, and we do not wait for it. Empty output yields an empty string.
pub async fn run_single(cmd: &str) -> Result<String> {
    let mut command = shell_command(cmd);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| FeedError::SpawnError {
        command: cmd.to_string(),
        source,
    })?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("no stdout pipe for '{cmd}'"))?;

    let read_error = |source: io::Error| FeedError::ReadError {
        command: cmd.to_string(),
        source,
    };

    let mut reader = BufReader::new(stdout);
    let mut first = Vec::new();

    let (status, drained) = {
        let output = read_output(&mut reader, &mut first);
        tokio::pin!(output);
        tokio::select! {
            status = child.wait() => (status, false),
            read = &mut output => {
                read.map_err(read_error)?;
                (child.wait().await, true)
            }
        }
    };
    let status = status.map_err(read_error)?;

    // `read_until` keeps partial input in `first` when cancelled.
    if !drained && !first.ends_with(b"\n") {
        reader
            .read_until(b'\n', &mut first)
            .await
            .map_err(read_error)?;
    }
    drop(reader);

    debug!(cmd = %cmd, %status, bytes = first.len(), "single command exited");

    Ok(strip_newline(String::from_utf8_lossy(&first).into_owned()))
}

/// Read the first line into `first`, then discard everything up to EOF.
async fn read_output<R>(reader: &mut R, first: &mut Vec<u8>) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    reader.read_until(b'\n', first).await?;
    tokio::io::copy_buf(reader, &mut tokio::io::sink()).await?;
    Ok(())
}
