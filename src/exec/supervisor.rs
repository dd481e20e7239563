// src/exec/supervisor.rs

//! Keeps exactly one live process per long-running command.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CommandSpec;
use crate::engine::RuntimeEvent;
use crate::errors::{FeedError, Result};
use crate::exec::launcher;
use crate::types::{BlockId, CommandId};

/// Lifecycle of a managed command slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandState {
    NotStarted,
    Running,
    Restarting,
}

/// One long-running command and the process currently backing it.
#[derive(Debug)]
struct ManagedCommand {
    block: BlockId,
    cmd: String,
    state: CommandState,
    child: Option<Child>,
    reader: Option<JoinHandle<()>>,
    restarts: u64,
}

/// Owns every managed command.
///
/// Output lines, hangups and read errors are forwarded to the runtime as
/// [`RuntimeEvent`]s; the runtime decides what to do with them and calls
/// [`Supervisor::restart`] when a command has to be replaced.
#[derive(Debug)]
pub struct Supervisor {
    commands: Vec<ManagedCommand>,
    events_tx: mpsc::Sender<RuntimeEvent>,
}

impl Supervisor {
    pub fn new(specs: Vec<CommandSpec>, events_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        let commands = specs
            .into_iter()
            .map(|spec| ManagedCommand {
                block: spec.block,
                cmd: spec.cmd,
                state: CommandState::NotStarted,
                child: None,
                reader: None,
                restarts: 0,
            })
            .collect();
        Self {
            commands,
            events_tx,
        }
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn block_of(&self, id: CommandId) -> Option<BlockId> {
        self.commands.get(id.0).map(|c| c.block)
    }

    pub fn state(&self, id: CommandId) -> Option<CommandState> {
        self.commands.get(id.0).map(|c| c.state)
    }

    /// Number of times the command was replaced after its first start.
    pub fn restarts(&self, id: CommandId) -> Option<u64> {
        self.commands.get(id.0).map(|c| c.restarts)
    }

    pub fn pid(&self, id: CommandId) -> Option<u32> {
        self.commands
            .get(id.0)
            .and_then(|c| c.child.as_ref())
            .and_then(|child| child.id())
    }

    /// Start every command for the first time.
    pub async fn start_all(&mut self) -> Result<()> {
        for idx in 0..self.commands.len() {
            self.restart(CommandId(idx)).await?;
        }
        Ok(())
    }

    /// Replace the process behind `id`.
    ///
    /// The process group of a previous process is killed and the process
    /// waited for before the replacement is spawned. Spawn failures are fatal.
    pub async fn restart(&mut self, id: CommandId) -> Result<()> {
        let events_tx = self.events_tx.clone();
        let slot = self
            .commands
            .get_mut(id.0)
            .ok_or_else(|| FeedError::ConfigError(format!("unknown {id}")))?;

        if let Some(reader) = slot.reader.take() {
            reader.abort();
        }

        if let Some(mut child) = slot.child.take() {
            slot.state = CommandState::Restarting;
            slot.restarts += 1;
            launcher::signal_group(&child, libc::SIGKILL);
            match child.wait().await {
                Ok(status) => debug!(command = %id, %status, "previous process exited"),
                Err(e) => warn!(command = %id, error = %e, "failed to wait for previous process"),
            }
        }

        let launched = launcher::spawn_reader(&slot.cmd)?;
        slot.reader = Some(spawn_line_reader(id, launched.stdout, events_tx));
        slot.child = Some(launched.child);
        slot.state = CommandState::Running;

        if slot.restarts > 0 {
            info!(
                command = %id,
                cmd = %slot.cmd,
                restarts = slot.restarts,
                pid = ?slot.child.as_ref().and_then(|c| c.id()),
                "command restarted"
            );
        } else {
            info!(command = %id, cmd = %slot.cmd, "command started");
        }

        Ok(())
    }

    /// SIGTERM every running command and wait for all of them.
    pub async fn terminate_all(&mut self) {
        for (idx, slot) in self.commands.iter_mut().enumerate() {
            if let Some(reader) = slot.reader.take() {
                reader.abort();
            }
            if let Some(mut child) = slot.child.take() {
                debug!(command = %CommandId(idx), "terminating command");
                launcher::terminate(&mut child).await;
            }
            slot.state = CommandState::NotStarted;
        }
    }
}

/// Forward every output line of a command to the runtime.
///
/// Lines are read as bytes and decoded lossily, so odd output never ends the
/// stream. End of file is reported as a hangup.
fn spawn_line_reader(
    id: CommandId,
    stdout: ChildStdout,
    events_tx: mpsc::Sender<RuntimeEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = BufReader::new(stdout);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let event = match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => RuntimeEvent::CommandHungUp { command: id },
                Ok(_) => RuntimeEvent::LineReceived {
                    command: id,
                    line: String::from_utf8_lossy(&buf).into_owned(),
                },
                Err(error) => RuntimeEvent::ReadFailed { command: id, error },
            };

            let last = !matches!(event, RuntimeEvent::LineReceived { .. });
            if events_tx.send(event).await.is_err() || last {
                break;
            }
        }

        debug!(command = %id, "line reader ended");
    })
}
