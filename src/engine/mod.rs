// src/engine/mod.rs

//! Event-driven aggregation engine.
//!
//! The pure core state machine lives in [`core`] (with the per-event logic in
//! [`event_handlers`] and the rate limiter in [`scheduler`]); the async shell
//! that owns processes, the timer and the sink is [`runtime`].

use crate::types::CommandId;

/// Events flowing into the runtime from line readers and signal handling.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A managed command printed a line (newline included, if any).
    LineReceived { command: CommandId, line: String },
    /// A managed command closed its stdout (exited or crashed).
    CommandHungUp { command: CommandId },
    /// Reading a managed command's stdout failed.
    ReadFailed {
        command: CommandId,
        error: std::io::Error,
    },
    /// The forced refresh timer expired.
    TimerFired,
    /// SIGTERM / SIGINT received.
    ShutdownRequested,
}

impl RuntimeEvent {
    /// Service order within one readiness pass: shutdown first, then
    /// commands in table order, then the timer.
    pub fn pass_order(&self) -> (u8, usize) {
        match self {
            RuntimeEvent::ShutdownRequested => (0, 0),
            RuntimeEvent::LineReceived { command, .. }
            | RuntimeEvent::CommandHungUp { command }
            | RuntimeEvent::ReadFailed { command, .. } => (1, command.0),
            RuntimeEvent::TimerFired => (2, 0),
        }
    }
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod scheduler;
pub mod signals;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
pub use scheduler::{RefreshDecision, UpdateScheduler};
pub use signals::spawn_signal_listener;
