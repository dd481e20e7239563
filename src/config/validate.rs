// src/config/validate.rs

use crate::config::model::{BlockSpec, FeedConfig, RawFeedConfig};
use crate::errors::{FeedError, Result};

impl TryFrom<RawFeedConfig> for FeedConfig {
    type Error = FeedError;

    fn try_from(raw: RawFeedConfig) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(FeedConfig::new_unchecked(raw.blocks, raw.bar, raw.timing))
    }
}

fn validate_raw_config(cfg: &RawFeedConfig) -> Result<()> {
    validate_timing(cfg)?;
    validate_blocks(cfg)?;
    validate_bar(cfg)?;
    Ok(())
}

fn validate_timing(cfg: &RawFeedConfig) -> Result<()> {
    if cfg.timing.force_update_interval.is_zero() {
        return Err(FeedError::ConfigError(
            "force update interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_blocks(cfg: &RawFeedConfig) -> Result<()> {
    for (idx, block) in cfg.blocks.iter().enumerate() {
        match block {
            BlockSpec::Raw { .. } => {}
            BlockSpec::Continuous { cmd } => ensure_command(idx, "-c", cmd)?,
            BlockSpec::Single { cmd, triggers } => {
                ensure_command(idx, "-s", cmd)?;
                for trigger in triggers {
                    ensure_command(idx, "trigger", trigger)?;
                }
            }
        }
    }
    Ok(())
}

fn ensure_command(idx: usize, what: &str, cmd: &str) -> Result<()> {
    if cmd.trim().is_empty() {
        return Err(FeedError::ConfigError(format!(
            "block {idx}: {what} command must not be empty"
        )));
    }
    Ok(())
}

fn validate_bar(cfg: &RawFeedConfig) -> Result<()> {
    match cfg.bar.as_deref() {
        Some([]) => Err(FeedError::ConfigError(
            "`--` must be followed by a bar program".to_string(),
        )),
        Some([program, ..]) if program.is_empty() => Err(FeedError::ConfigError(
            "bar program name must not be empty".to_string(),
        )),
        _ => Ok(()),
    }
}
