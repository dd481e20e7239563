// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! The core consumes [`RuntimeEvent`]s and produces an updated block
//! registry plus a list of [`CoreCommand`]s for the IO shell
//! (`engine::runtime::Runtime`), which owns processes, the timer and the
//! sink. Nothing here spawns, reads or sleeps, so the semantics can be unit
//! tested without processes; time is passed in explicitly.

use tokio::time::Instant;
use tracing::{info, warn};

use crate::blocks::BlockRegistry;
use crate::config::{CommandSpec, FeedConfig, Timing};
use crate::engine::event_handlers::{handle_hangup, handle_line, handle_timer};
use crate::engine::scheduler::{RefreshDecision, UpdateScheduler};
use crate::engine::{CoreStep, RuntimeEvent};
use crate::errors::{FeedError, Result};
use crate::types::{BlockId, BlockKind};

#[derive(Debug)]
pub struct CoreRuntime {
    registry: BlockRegistry,
    /// Managed command table: command id -> owning block.
    routes: Vec<CommandSpec>,
    scheduler: UpdateScheduler,
}

impl CoreRuntime {
    pub fn new(registry: BlockRegistry, routes: Vec<CommandSpec>, timing: Timing) -> Self {
        Self {
            registry,
            routes,
            scheduler: UpdateScheduler::new(timing),
        }
    }

    pub fn from_config(cfg: &FeedConfig) -> Self {
        Self::new(
            BlockRegistry::from_config(cfg),
            cfg.commands(),
            cfg.timing(),
        )
    }

    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    pub fn compose(&self) -> String {
        self.registry.compose()
    }

    /// Commands to run before the first publish: every single block is
    /// computed once.
    pub fn startup(&self) -> CoreStep {
        handle_timer(&self.registry)
    }

    /// Handle a single runtime event.
    ///
    /// Read failures are fatal and come back as `Err`.
    pub fn step(&mut self, event: RuntimeEvent) -> Result<CoreStep> {
        match event {
            RuntimeEvent::LineReceived { command, line } => {
                handle_line(&mut self.registry, &self.routes, command, line)
            }
            RuntimeEvent::CommandHungUp { command } => Ok(handle_hangup(command)),
            RuntimeEvent::ReadFailed { command, error } => Err(FeedError::ReadError {
                command: self
                    .routes
                    .get(command.0)
                    .map(|r| r.cmd.clone())
                    .unwrap_or_else(|| command.to_string()),
                source: error,
            }),
            RuntimeEvent::TimerFired => Ok(handle_timer(&self.registry)),
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                Ok(CoreStep::stop())
            }
        }
    }

    /// Apply the rate limit to a refresh of `block` at time `now`.
    ///
    /// Returns the command to run, or `None` when the request is dropped.
    /// An accepted request records `now` as the block's refresh time.
    pub fn begin_refresh(&mut self, block: BlockId, now: Instant) -> Option<String> {
        let (cmd, last) = match self.registry.get(block) {
            Some(b) if b.kind() == BlockKind::Single => {
                (b.single_cmd()?.to_string(), b.last_refresh())
            }
            _ => {
                warn!(block = %block, "refresh requested for a non-single block");
                return None;
            }
        };

        match self.scheduler.decide(last, now) {
            RefreshDecision::Run => {
                self.registry.mark_refreshed(block, now);
                Some(cmd)
            }
            RefreshDecision::TooFrequent { elapsed } => {
                warn!(
                    block = %block,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "too frequent updates; refresh dropped"
                );
                None
            }
        }
    }

    /// Store the output of a completed single command.
    pub fn complete_refresh(&mut self, block: BlockId, text: String) -> Result<()> {
        self.registry.set_text(block, text)
    }
}
