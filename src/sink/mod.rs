// src/sink/mod.rs

//! Where composed status lines go.
//!
//! The runtime talks to a `StatusSink` instead of a concrete process so
//! tests can record published lines. Production uses [`BarSink`].

pub mod bar;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

pub use bar::BarSink;

/// Receives one composed line per readiness pass.
pub trait StatusSink: Send {
    /// Write `line` (already newline-terminated) and flush it.
    fn publish<'a>(
        &'a mut self,
        line: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;

    /// Stop any downstream process. Called once during shutdown.
    fn shutdown(&mut self) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}
