// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`launcher`] spawns shell commands wired through pipes.
//! - [`supervisor`] keeps the long-running commands alive and forwards their
//!   output to the runtime as `RuntimeEvent`s.
//! - [`backend`] defines the `SingleRunner` trait used for single blocks.
//! - [`oneshot`] is the real `SingleRunner`.

pub mod backend;
pub mod launcher;
pub mod oneshot;
pub mod supervisor;

pub use backend::SingleRunner;
pub use oneshot::{run_single, ShellSingleRunner};
pub use supervisor::{CommandState, Supervisor};
