use std::time::Duration;

use barfeed::config::{BlockSpec, FeedConfig, RawFeedConfig};

/// Builder for `FeedConfig` to simplify test setup.
pub struct FeedConfigBuilder {
    config: RawFeedConfig,
}

impl FeedConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RawFeedConfig::default(),
        }
    }

    pub fn raw(mut self, text: &str) -> Self {
        self.config.blocks.push(BlockSpec::Raw {
            text: text.to_string(),
        });
        self
    }

    pub fn continuous(mut self, cmd: &str) -> Self {
        self.config.blocks.push(BlockSpec::Continuous {
            cmd: cmd.to_string(),
        });
        self
    }

    pub fn single(mut self, cmd: &str, triggers: &[&str]) -> Self {
        self.config.blocks.push(BlockSpec::Single {
            cmd: cmd.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn bar(mut self, argv: &[&str]) -> Self {
        self.config.bar = Some(argv.iter().map(|a| a.to_string()).collect());
        self
    }

    pub fn min_interval(mut self, d: Duration) -> Self {
        self.config.timing.min_update_interval = d;
        self
    }

    pub fn force_interval(mut self, d: Duration) -> Self {
        self.config.timing.force_update_interval = d;
        self
    }

    pub fn build(self) -> FeedConfig {
        FeedConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for FeedConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
