//! Flow graph infrastructure: rule table, jump routing, resolver, graph

mod data_flow_graph;
mod evaluation_order;
mod export;
mod jumps;
mod resolver;
mod successor_index;

pub use data_flow_graph::{CacheStats, DataFlowGraph};
pub use export::{EdgeRecord, FlowGraphSnapshot, PointRecord};
pub use jumps::JumpKind;
