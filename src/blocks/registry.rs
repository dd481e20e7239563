// src/blocks/registry.rs

use tokio::time::Instant;

use crate::config::{BlockSpec, FeedConfig};
use crate::errors::{FeedError, Result};
use crate::types::{BlockId, BlockKind};

/// One segment of the composed status line.
///
/// All text is owned: raw text is copied from the configuration once and
/// never replaced afterwards.
#[derive(Debug, Clone)]
pub struct Block {
    id: BlockId,
    kind: BlockKind,
    text: String,
    /// One-shot command of a single block.
    single_cmd: Option<String>,
    /// Monotonic time of the last recomputation (single blocks only).
    last_refresh: Option<Instant>,
}

impl Block {
    fn from_spec(id: BlockId, spec: &BlockSpec) -> Self {
        let (text, single_cmd) = match spec {
            BlockSpec::Raw { text } => (text.clone(), None),
            BlockSpec::Continuous { .. } => (String::new(), None),
            BlockSpec::Single { cmd, .. } => (String::new(), Some(cmd.clone())),
        };
        Self {
            id,
            kind: spec.kind(),
            text,
            single_cmd,
            last_refresh: None,
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn single_cmd(&self) -> Option<&str> {
        self.single_cmd.as_deref()
    }

    pub fn last_refresh(&self) -> Option<Instant> {
        self.last_refresh
    }
}

/// Ordered collection of all blocks.
#[derive(Debug, Clone, Default)]
pub struct BlockRegistry {
    blocks: Vec<Block>,
}

impl BlockRegistry {
    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::from_specs(cfg.blocks())
    }

    pub fn from_specs(specs: &[BlockSpec]) -> Self {
        let blocks = specs
            .iter()
            .enumerate()
            .map(|(idx, spec)| Block::from_spec(BlockId(idx), spec))
            .collect();
        Self { blocks }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    /// Ids of all single blocks, in display order.
    pub fn single_blocks(&self) -> Vec<BlockId> {
        self.blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Single)
            .map(|b| b.id)
            .collect()
    }

    /// Replace the text of a continuous or single block.
    ///
    /// Raw blocks are immutable; asking to change one is a programming error
    /// reported as `ConfigError`.
    pub fn set_text(&mut self, id: BlockId, text: String) -> Result<()> {
        let block = self
            .blocks
            .get_mut(id.0)
            .ok_or_else(|| FeedError::ConfigError(format!("unknown {id}")))?;

        if block.kind == BlockKind::Raw {
            return Err(FeedError::ConfigError(format!(
                "{id} is a raw block and cannot change its text"
            )));
        }

        block.text = text;
        Ok(())
    }

    pub(crate) fn mark_refreshed(&mut self, id: BlockId, at: Instant) {
        if let Some(block) = self.blocks.get_mut(id.0) {
            block.last_refresh = Some(at);
        }
    }

    /// Concatenate every block's text in order, without separators, and
    /// terminate with a single newline.
    pub fn compose(&self) -> String {
        let mut line: String = self.blocks.iter().map(|b| b.text.as_str()).collect();
        line.push('\n');
        line
    }
}

/// Strip one trailing `\n` (and a preceding `\r`, if any).
pub fn strip_newline(mut line: String) -> String {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    line
}
