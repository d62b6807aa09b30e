//! Flow Graph Feature
//!
//! Evaluation-order data flow graph: for any ENTRY/EXIT point of a node,
//! which points execute immediately before (or after) it.
//!
//! ## Structure
//! - `domain/` - ProgramPoint, Phase, FlowEdge, EdgeKind
//! - `ports/` - FlowAnalyzer trait
//! - `application/` - BuildFlowGraphUseCase
//! - `infrastructure/` - rule table, jump routing, DataFlowGraph

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports
pub use application::{BuildFlowGraphUseCase, DataFlowGraphAnalyzer, FlowGraphResult};
pub use domain::{EdgeKind, FlowEdge, Phase, ProgramPoint};
pub use infrastructure::{
    CacheStats, DataFlowGraph, EdgeRecord, FlowGraphSnapshot, JumpKind, PointRecord,
};
pub use ports::FlowAnalyzer;
