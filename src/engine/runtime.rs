// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::{SingleRunner, Supervisor};
use crate::sink::StatusSink;
use crate::types::BlockId;

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Single-threaded event loop driving the core.
///
/// Each readiness pass waits for one event (or the force-refresh timer),
/// drains everything else already queued, services the batch in command
/// table order and then publishes exactly one status line.
pub struct Runtime<S: StatusSink, R: SingleRunner> {
    core: CoreRuntime,
    supervisor: Supervisor,
    sink: S,
    runner: R,
    event_rx: mpsc::Receiver<RuntimeEvent>,
}

impl<S: StatusSink, R: SingleRunner> fmt::Debug for Runtime<S, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .field("supervisor", &self.supervisor)
            .finish_non_exhaustive()
    }
}

impl<S: StatusSink, R: SingleRunner> Runtime<S, R> {
    pub fn new(
        core: CoreRuntime,
        supervisor: Supervisor,
        sink: S,
        runner: R,
        event_rx: mpsc::Receiver<RuntimeEvent>,
    ) -> Self {
        Self {
            core,
            supervisor,
            sink,
            runner,
            event_rx,
        }
    }

    /// Run until shutdown is requested or a fatal error occurs.
    ///
    /// Either way every child process is terminated and waited for before
    /// this returns.
    pub async fn run(mut self) -> Result<()> {
        info!(
            blocks = self.core.registry().len(),
            commands = self.supervisor.len(),
            "barfeed runtime started"
        );

        let result = self.run_loop().await;

        info!("stopping all child processes");
        self.supervisor.terminate_all().await;
        self.sink.shutdown().await;

        info!("runtime exiting");
        result
    }

    async fn run_loop(&mut self) -> Result<()> {
        let startup = self.core.startup();
        for command in startup.commands {
            self.execute_command(command).await?;
        }
        self.publish().await?;

        self.supervisor.start_all().await?;

        let period = self.core.scheduler().force_update_interval();
        let mut timer = interval_at(Instant::now() + period, period);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            let first = tokio::select! {
                event = self.event_rx.recv() => match event {
                    Some(e) => e,
                    None => {
                        info!("runtime event channel closed; exiting");
                        return Ok(());
                    }
                },
                _ = timer.tick() => RuntimeEvent::TimerFired,
            };

            let batch = self.collect_pass(first);
            if !self.handle_pass(batch).await? {
                return Ok(());
            }

            self.publish().await?;
        }
    }

    /// Gather every event that is ready right now, in service order.
    fn collect_pass(&mut self, first: RuntimeEvent) -> Vec<RuntimeEvent> {
        let mut batch = vec![first];
        while let Ok(event) = self.event_rx.try_recv() {
            batch.push(event);
        }
        // Stable: lines of one command keep their arrival order.
        batch.sort_by_key(RuntimeEvent::pass_order);
        debug!(events = batch.len(), "readiness pass");
        batch
    }

    /// Returns `false` when the loop must stop.
    async fn handle_pass(&mut self, batch: Vec<RuntimeEvent>) -> Result<bool> {
        for event in batch {
            let step = self.core.step(event)?;
            for command in step.commands {
                self.execute_command(command).await?;
            }
            if !step.keep_running {
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::RefreshSingle(block) => self.refresh_single(block).await,
            CoreCommand::RestartCommand(id) => self.supervisor.restart(id).await,
        }
    }

    /// Blocks the loop until the one-shot command exits.
    async fn refresh_single(&mut self, block: BlockId) -> Result<()> {
        let Some(cmd) = self.core.begin_refresh(block, Instant::now()) else {
            return Ok(());
        };
        let text = self.runner.run(&cmd).await?;
        debug!(block = %block, text = %text, "single block refreshed");
        self.core.complete_refresh(block, text)
    }

    async fn publish(&mut self) -> Result<()> {
        let line = self.core.compose();
        self.sink.publish(&line).await
    }
}
