// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The block flags are order-sensitive: `-r`, `-c` and `-s` may be freely
//! interleaved and the resulting blocks appear in the status line in the order
//! they were given. `clap` groups values per flag, so the original order is
//! recovered from `ArgMatches::indices_of`.

use std::ffi::OsString;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::{ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};

use crate::config::{parse_duration, BlockSpec, FeedConfig, RawFeedConfig, Timing};
use crate::errors::Result;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "barfeed",
    version,
    about = "Compose the output of shell commands into a single status line.",
    long_about = None,
    override_usage = "barfeed [OPTIONS] [-r TEXT | -c COMMAND | -s COMMAND [TRIGGER...]]... [-- BAR [ARGS...]]"
)]
struct RawArgs {
    /// Raw block with fixed TEXT.
    #[arg(short = 'r', value_name = "TEXT", action = ArgAction::Append, allow_hyphen_values = true)]
    raw: Vec<String>,

    /// Continuous block: every line COMMAND prints becomes the block text.
    #[arg(short = 'c', value_name = "COMMAND", action = ArgAction::Append, allow_hyphen_values = true)]
    continuous: Vec<String>,

    /// Single block: COMMAND runs on demand; each TRIGGER is a long-running
    /// command whose output lines request a refresh.
    #[arg(short = 's', value_name = "COMMAND", num_args = 1.., action = ArgAction::Append)]
    single: Vec<String>,

    /// Minimum spacing between two refreshes of the same single block.
    #[arg(long, value_name = "DURATION", default_value = "500ms", value_parser = parse_duration)]
    min_interval: Duration,

    /// Period of the forced refresh of all single blocks.
    #[arg(long, value_name = "DURATION", default_value = "30s", value_parser = parse_duration)]
    force_interval: Duration,

    /// Logging level (error, warn, info, debug, trace). Logs go to stderr.
    #[arg(long, value_enum, value_name = "LEVEL")]
    log_level: Option<LogLevel>,

    /// Bar program (and its arguments) that receives the status line on stdin.
    #[arg(last = true, value_name = "BAR")]
    bar: Option<Vec<String>>,
}

/// Parsed command line for `barfeed`.
#[derive(Debug, Clone)]
pub struct CliArgs {
    /// Blocks in display order.
    pub blocks: Vec<BlockSpec>,
    pub bar: Option<Vec<String>>,
    pub timing: Timing,
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    /// Validate the parsed arguments into a [`FeedConfig`].
    pub fn to_config(&self) -> Result<FeedConfig> {
        FeedConfig::try_from(RawFeedConfig {
            blocks: self.blocks.clone(),
            bar: self.bar.clone(),
            timing: self.timing,
        })
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse `std::env::args_os()`.
///
/// `--help` and `--version` exit with status 0; any usage error is printed
/// and exits with status 1.
pub fn parse() -> CliArgs {
    match try_parse_from(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                let _ = err.print();
                std::process::exit(1);
            }
        },
    }
}

/// Parse an explicit argument list (first item is the program name).
pub fn try_parse_from<I, T>(itr: I) -> std::result::Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = RawArgs::command().try_get_matches_from(itr)?;
    let raw = RawArgs::from_arg_matches(&matches)?;
    let blocks = ordered_blocks(&matches, &raw);

    Ok(CliArgs {
        blocks,
        bar: raw.bar,
        timing: Timing {
            min_update_interval: raw.min_interval,
            force_update_interval: raw.force_interval,
        },
        log_level: raw.log_level,
    })
}

/// Merge the per-flag value lists back into command-line order.
fn ordered_blocks(matches: &ArgMatches, raw: &RawArgs) -> Vec<BlockSpec> {
    let mut keyed: Vec<(usize, BlockSpec)> = Vec::new();

    if let Some(indices) = matches.indices_of("raw") {
        keyed.extend(
            indices
                .zip(raw.raw.iter())
                .map(|(idx, text)| (idx, BlockSpec::Raw { text: text.clone() })),
        );
    }

    if let Some(indices) = matches.indices_of("continuous") {
        keyed.extend(
            indices
                .zip(raw.continuous.iter())
                .map(|(idx, cmd)| (idx, BlockSpec::Continuous { cmd: cmd.clone() })),
        );
    }

    // `single` holds the values of every occurrence back to back, with one
    // index per value; an occurrence is keyed by the index of its COMMAND.
    if let (Some(mut indices), Some(occurrences)) = (
        matches.indices_of("single"),
        matches.get_occurrences::<String>("single"),
    ) {
        let mut values = raw.single.iter();
        for occurrence in occurrences {
            let group: Vec<String> = values.by_ref().take(occurrence.count()).cloned().collect();
            let Some((cmd, triggers)) = group.split_first() else {
                continue;
            };
            let Some(first) = indices.next() else {
                break;
            };
            for _ in triggers {
                indices.next();
            }
            keyed.push((
                first,
                BlockSpec::Single {
                    cmd: cmd.clone(),
                    triggers: triggers.to_vec(),
                },
            ));
        }
    }

    keyed.sort_by_key(|(idx, _)| *idx);
    keyed.into_iter().map(|(_, spec)| spec).collect()
}
