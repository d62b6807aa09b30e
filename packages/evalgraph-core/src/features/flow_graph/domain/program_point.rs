//! Program points

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::features::parsing::domain::Cursor;

/// Before or after evaluating a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Phase {
    Entry,
    Exit,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Entry => "ENTRY",
            Phase::Exit => "EXIT",
        })
    }
}

/// `(cursor, phase)`; ordered by node then phase, i.e. tree order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProgramPoint {
    pub cursor: Cursor,
    pub phase: Phase,
}

impl ProgramPoint {
    pub fn new(cursor: Cursor, phase: Phase) -> Self {
        Self { cursor, phase }
    }

    pub fn entry(cursor: Cursor) -> Self {
        Self::new(cursor, Phase::Entry)
    }

    pub fn exit(cursor: Cursor) -> Self {
        Self::new(cursor, Phase::Exit)
    }

    pub fn is_entry(&self) -> bool {
        self.phase == Phase::Entry
    }
}

impl fmt::Display for ProgramPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.phase, self.cursor)
    }
}
