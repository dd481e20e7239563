// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::{debug, warn};

use crate::blocks::{strip_newline, BlockRegistry};
use crate::config::CommandSpec;
use crate::errors::Result;
use crate::types::{BlockId, BlockKind, CommandId};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Recompute a single block (subject to the rate limit).
    RefreshSingle(BlockId),
    /// Replace the process behind a managed command.
    RestartCommand(CommandId),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

impl CoreStep {
    pub(crate) fn keep(commands: Vec<CoreCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    pub(crate) fn stop() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: false,
        }
    }
}

/// A managed command printed a line.
///
/// - continuous block: the line (minus newline) becomes the block text.
/// - single block: the line is a trigger and requests a refresh.
pub fn handle_line(
    registry: &mut BlockRegistry,
    routes: &[CommandSpec],
    command: CommandId,
    line: String,
) -> Result<CoreStep> {
    let Some(route) = routes.get(command.0) else {
        warn!(command = %command, "line from unknown command ignored");
        return Ok(CoreStep::keep(Vec::new()));
    };

    let kind = registry.get(route.block).map(|b| b.kind());
    match kind {
        Some(BlockKind::Continuous) => {
            let text = strip_newline(line);
            debug!(command = %command, block = %route.block, text = %text, "continuous update");
            registry.set_text(route.block, text)?;
            Ok(CoreStep::keep(Vec::new()))
        }
        Some(BlockKind::Single) => {
            debug!(command = %command, block = %route.block, "trigger fired");
            Ok(CoreStep::keep(vec![CoreCommand::RefreshSingle(route.block)]))
        }
        Some(BlockKind::Raw) | None => {
            warn!(command = %command, block = %route.block, "command bound to a block that takes no input");
            Ok(CoreStep::keep(Vec::new()))
        }
    }
}

/// A managed command hung up: restart it. The block keeps its text.
pub fn handle_hangup(command: CommandId) -> CoreStep {
    debug!(command = %command, "command hung up; scheduling restart");
    CoreStep::keep(vec![CoreCommand::RestartCommand(command)])
}

/// The force-refresh timer fired: refresh every single block.
pub fn handle_timer(registry: &BlockRegistry) -> CoreStep {
    let commands = registry
        .single_blocks()
        .into_iter()
        .map(CoreCommand::RefreshSingle)
        .collect();
    CoreStep::keep(commands)
}
