// src/types.rs

//! Small shared identifier and enum types.

use std::fmt;

/// Position of a block in the composed status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub usize);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "block#{}", self.0)
    }
}

/// Slot of a long-running command in the supervisor table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommandId(pub usize);

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cmd#{}", self.0)
    }
}

/// How a block obtains its text.
///
/// - `Raw`: fixed text from the command line, never changes.
/// - `Continuous`: every line printed by a long-running command replaces the text.
/// - `Single`: a one-shot command is re-run on demand (triggers, timer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Raw,
    Continuous,
    Single,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BlockKind::Raw => "raw",
            BlockKind::Continuous => "continuous",
            BlockKind::Single => "single",
        };
        f.write_str(s)
    }
}
