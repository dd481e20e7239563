#![allow(dead_code)]

pub use barfeed_test_utils::init_tracing;

use tokio::sync::mpsc;

use barfeed::config::FeedConfig;
use barfeed::engine::{CoreRuntime, Runtime, RuntimeEvent};
use barfeed::exec::{SingleRunner, Supervisor};
use barfeed::sink::StatusSink;

/// Build a runtime for `cfg` and hand back a sender for injecting events.
pub fn build_runtime<S, R>(
    cfg: &FeedConfig,
    sink: S,
    runner: R,
) -> (Runtime<S, R>, mpsc::Sender<RuntimeEvent>)
where
    S: StatusSink,
    R: SingleRunner,
{
    let (tx, rx) = mpsc::channel::<RuntimeEvent>(64);
    let supervisor = Supervisor::new(cfg.commands(), tx.clone());
    let core = CoreRuntime::from_config(cfg);
    (Runtime::new(core, supervisor, sink, runner, rx), tx)
}
