//! Flow analyzer port (interface)
//!
//! Whatever turns a `SyntaxTree` into a flow graph listing. The use case only
//! sees this trait, so tests can swap in a canned analyzer.

use crate::features::flow_graph::infrastructure::FlowGraphSnapshot;
use crate::features::parsing::domain::SyntaxTree;
use crate::shared::models::Result;

pub trait FlowAnalyzer: Send + Sync {
    fn analyze(&self, tree: &SyntaxTree) -> Result<FlowGraphSnapshot>;
}
