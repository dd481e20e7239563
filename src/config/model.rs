// src/config/model.rs

use std::time::Duration;

use crate::types::{BlockId, BlockKind};

/// Minimum spacing between two recomputations of the same single block.
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// Period of the forced refresh of every single block.
pub const FORCE_UPDATE_INTERVAL: Duration = Duration::from_secs(30);

/// One block as given on the command line, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSpec {
    /// `-r TEXT`
    Raw { text: String },
    /// `-c COMMAND`
    Continuous { cmd: String },
    /// `-s COMMAND [TRIGGER...]`
    Single { cmd: String, triggers: Vec<String> },
}

impl BlockSpec {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockSpec::Raw { .. } => BlockKind::Raw,
            BlockSpec::Continuous { .. } => BlockKind::Continuous,
            BlockSpec::Single { .. } => BlockKind::Single,
        }
    }
}

/// Rate limit and forced refresh period for single blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub min_update_interval: Duration,
    pub force_update_interval: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            min_update_interval: MIN_UPDATE_INTERVAL,
            force_update_interval: FORCE_UPDATE_INTERVAL,
        }
    }
}

/// A long-running command the supervisor keeps alive, bound to one block.
///
/// For a continuous block it feeds the text; for a single block it is a
/// trigger whose lines only request a refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub block: BlockId,
    pub cmd: String,
}

/// Configuration exactly as parsed, before validation.
#[derive(Debug, Clone, Default)]
pub struct RawFeedConfig {
    pub blocks: Vec<BlockSpec>,
    /// Program and arguments after `--`, executed directly (no shell).
    pub bar: Option<Vec<String>>,
    pub timing: Timing,
}

/// Validated configuration. Build it with `FeedConfig::try_from(raw)`.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    blocks: Vec<BlockSpec>,
    bar: Option<Vec<String>>,
    timing: Timing,
}

impl FeedConfig {
    pub(crate) fn new_unchecked(
        blocks: Vec<BlockSpec>,
        bar: Option<Vec<String>>,
        timing: Timing,
    ) -> Self {
        Self {
            blocks,
            bar,
            timing,
        }
    }

    pub fn blocks(&self) -> &[BlockSpec] {
        &self.blocks
    }

    pub fn bar(&self) -> Option<&[String]> {
        self.bar.as_deref()
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// The supervisor's command table.
    ///
    /// Commands are numbered in block order: a continuous block contributes
    /// its feed command, a single block contributes each of its triggers.
    pub fn commands(&self) -> Vec<CommandSpec> {
        let mut out = Vec::new();
        for (idx, spec) in self.blocks.iter().enumerate() {
            let block = BlockId(idx);
            match spec {
                BlockSpec::Raw { .. } => {}
                BlockSpec::Continuous { cmd } => out.push(CommandSpec {
                    block,
                    cmd: cmd.clone(),
                }),
                BlockSpec::Single { triggers, .. } => {
                    out.extend(triggers.iter().map(|t| CommandSpec {
                        block,
                        cmd: t.clone(),
                    }));
                }
            }
        }
        out
    }
}
