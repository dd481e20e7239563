// src/engine/scheduler.rs

use std::time::Duration;

use tokio::time::Instant;

use crate::config::Timing;

/// Outcome of a refresh request for a single block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshDecision {
    Run,
    /// Dropped: the block was recomputed `elapsed` ago, which is not more
    /// than the minimum interval.
    TooFrequent { elapsed: Duration },
}

/// Governs when single blocks may recompute.
#[derive(Debug, Clone, Copy)]
pub struct UpdateScheduler {
    timing: Timing,
}

impl UpdateScheduler {
    pub fn new(timing: Timing) -> Self {
        Self { timing }
    }

    pub fn min_update_interval(&self) -> Duration {
        self.timing.min_update_interval
    }

    pub fn force_update_interval(&self) -> Duration {
        self.timing.force_update_interval
    }

    /// A never-refreshed block always runs; otherwise strictly more than the
    /// minimum interval must have passed.
    pub fn decide(&self, last_refresh: Option<Instant>, now: Instant) -> RefreshDecision {
        match last_refresh {
            None => RefreshDecision::Run,
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                if elapsed <= self.timing.min_update_interval {
                    RefreshDecision::TooFrequent { elapsed }
                } else {
                    RefreshDecision::Run
                }
            }
        }
    }
}
