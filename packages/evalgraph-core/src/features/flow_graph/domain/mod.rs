//! Flow graph domain models

mod edge;
mod program_point;

pub use edge::{EdgeKind, FlowEdge};
pub use program_point::{Phase, ProgramPoint};
