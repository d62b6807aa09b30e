//! Predecessor edges

use serde::{Deserialize, Serialize};

use super::program_point::ProgramPoint;

/// Why control flows along an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    Sequential,
    TrueBranch,
    FalseBranch,
    LoopBack,
    SwitchCase,
    Fallthrough,
    Exception,
    Jump,
    Finally,
    ShortCircuit,
}

impl EdgeKind {
    /// Edges that only exist because of a join
    pub fn is_branching(self) -> bool {
        !matches!(self, EdgeKind::Sequential)
    }
}

/// `from` is an immediate predecessor of the queried point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlowEdge {
    pub from: ProgramPoint,
    pub kind: EdgeKind,
}
