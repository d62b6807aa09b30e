//! Flow graph application layer

mod build_flow_graph;

pub use build_flow_graph::{BuildFlowGraphUseCase, DataFlowGraphAnalyzer, FlowGraphResult};
