// src/config/mod.rs

//! Feed configuration.
//!
//! Responsibilities:
//! - Define the data model for blocks, commands and timing (`model.rs`).
//! - Parse human-friendly durations (`duration.rs`).
//! - Validate a freshly parsed configuration (`validate.rs`).
//!
//! The command line is the only configuration source; see [`crate::cli`].

pub mod duration;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use model::{
    BlockSpec, CommandSpec, FeedConfig, RawFeedConfig, Timing, FORCE_UPDATE_INTERVAL,
    MIN_UPDATE_INTERVAL,
};
