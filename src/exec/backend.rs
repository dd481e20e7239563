// src/exec/backend.rs

//! Pluggable one-shot runner for single blocks.
//!
//! The runtime asks a `SingleRunner` for the new text of a single block.
//! Production uses [`ShellSingleRunner`](crate::exec::ShellSingleRunner);
//! tests can provide a runner that does not spawn processes.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// Trait abstracting how a single block's command is evaluated.
pub trait SingleRunner: Send {
    /// Run `cmd` to completion and return its first output line without the
    /// trailing newline.
    fn run<'a>(
        &'a mut self,
        cmd: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;
}
