// src/blocks/mod.rs

//! Display segments of the status line and their current text.

pub mod registry;

pub use registry::{strip_newline, Block, BlockRegistry};
