// src/lib.rs

pub mod blocks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sink;
pub mod types;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::engine::{spawn_signal_listener, CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::exec::{ShellSingleRunner, Supervisor};
use crate::sink::BarSink;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - configuration from the command line
/// - the command supervisor and its event channel
/// - the bar sink
/// - SIGTERM / SIGINT handling
/// - the runtime loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = args.to_config()?;
    debug!(?cfg, "configuration");

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    spawn_signal_listener(rt_tx.clone());

    let supervisor = Supervisor::new(cfg.commands(), rt_tx);
    let sink = BarSink::from_config(&cfg);
    let core = CoreRuntime::from_config(&cfg);

    info!(
        blocks = cfg.blocks().len(),
        bar = ?cfg.bar(),
        "starting status feed"
    );

    let runtime = Runtime::new(core, supervisor, sink, ShellSingleRunner, rt_rx);
    runtime.run().await
}
