// src/sink/bar.rs

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, ChildStdin};
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::errors::{FeedError, Result};
use crate::exec::launcher;
use crate::sink::StatusSink;

#[derive(Debug)]
struct RunningBar {
    child: Child,
    stdin: ChildStdin,
}

/// Status sink backed by the bar-display program.
///
/// With a bar command the sink owns at most one bar process, restarting it
/// whenever it is found dead before a publish. Without one, lines go to our
/// own stdout.
#[derive(Debug)]
pub struct BarSink {
    argv: Option<Vec<String>>,
    bar: Option<RunningBar>,
    spawns: u64,
}

impl BarSink {
    pub fn new(argv: Option<Vec<String>>) -> Self {
        Self {
            argv,
            bar: None,
            spawns: 0,
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::new(cfg.bar().map(|argv| argv.to_vec()))
    }

    /// How many times a bar process has been spawned.
    pub fn spawns(&self) -> u64 {
        self.spawns
    }

    pub fn pid(&self) -> Option<u32> {
        self.bar.as_ref().and_then(|bar| bar.child.id())
    }

    /// (Re)spawn the bar process if it never started or has exited.
    pub fn ensure_running(&mut self) -> Result<()> {
        let Some(argv) = self.argv.as_deref() else {
            return Ok(());
        };

        if let Some(bar) = self.bar.as_mut() {
            match bar.child.try_wait()? {
                None => return Ok(()),
                Some(status) => warn!(%status, "bar process exited; restarting"),
            }
        }

        let (child, stdin) = launcher::spawn_writer(argv)?;
        self.spawns += 1;
        info!(program = %argv[0], pid = ?child.id(), spawns = self.spawns, "bar process started");
        self.bar = Some(RunningBar { child, stdin });
        Ok(())
    }

    /// Write `line` to stdout or the bar.
    ///
    /// Returns `false` when the bar could not take the line; the bar is then
    /// dropped so the next [`ensure_running`](Self::ensure_running) replaces it.
    async fn write_line(&mut self, line: &str) -> Result<bool> {
        if self.argv.is_none() {
            let mut stdout = tokio::io::stdout();
            write_and_flush(&mut stdout, line)
                .await
                .map_err(|e| FeedError::SinkError(format!("writing to stdout: {e}")))?;
            return Ok(true);
        }

        let Some(bar) = self.bar.as_mut() else {
            return Ok(false);
        };

        let written = write_and_flush(&mut bar.stdin, line).await;
        if let Err(e) = written {
            warn!(error = %e, "failed to write to bar process; dropping it");
            if let Some(RunningBar { child, .. }) = self.bar.take() {
                launcher::signal_group(&child, libc::SIGKILL);
            }
            return Ok(false);
        }
        Ok(true)
    }
}

async fn write_and_flush<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.flush().await
}

impl StatusSink for BarSink {
    fn publish<'a>(
        &'a mut self,
        line: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            self.ensure_running()?;
            if self.write_line(line).await? {
                return Ok(());
            }

            // The bar died between the liveness check and the write.
            self.ensure_running()?;
            if !self.write_line(line).await? {
                warn!("replacement bar process did not take the line");
            }
            Ok(())
        })
    }

    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            if let Some(RunningBar { mut child, stdin }) = self.bar.take() {
                drop(stdin);
                debug!(pid = ?child.id(), "terminating bar process");
                launcher::terminate(&mut child).await;
            }
        })
    }
}
