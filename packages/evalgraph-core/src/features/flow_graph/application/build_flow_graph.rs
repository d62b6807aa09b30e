//! Build flow graph use case
//!
//! Parse + analyze in one step. The resulting snapshot owns its data, so it
//! outlives the `DataFlowGraph` that produced it.

use tracing::debug;

use crate::config::FlowGraphConfig;
use crate::features::flow_graph::infrastructure::{DataFlowGraph, FlowGraphSnapshot};
use crate::features::flow_graph::ports::FlowAnalyzer;
use crate::features::parsing::domain::SyntaxTree;
use crate::features::parsing::ports::Parser;
use crate::shared::models::Result;

/// `FlowAnalyzer` backed by the lazy `DataFlowGraph`
#[derive(Debug, Clone, Default)]
pub struct DataFlowGraphAnalyzer {
    config: FlowGraphConfig,
}

impl DataFlowGraphAnalyzer {
    pub fn new(config: FlowGraphConfig) -> Self {
        Self { config }
    }
}

impl FlowAnalyzer for DataFlowGraphAnalyzer {
    fn analyze(&self, tree: &SyntaxTree) -> Result<FlowGraphSnapshot> {
        DataFlowGraph::with_config(tree, self.config.clone())?.snapshot()
    }
}

/// Parsed tree plus its flow graph listing
#[derive(Debug)]
pub struct FlowGraphResult {
    pub tree: SyntaxTree,
    pub snapshot: FlowGraphSnapshot,
}

pub struct BuildFlowGraphUseCase<P: Parser, A: FlowAnalyzer> {
    parser: P,
    analyzer: A,
}

impl<P: Parser, A: FlowAnalyzer> BuildFlowGraphUseCase<P, A> {
    pub fn new(parser: P, analyzer: A) -> Self {
        Self { parser, analyzer }
    }

    pub fn execute(&self, source: &str, file_path: &str) -> Result<FlowGraphResult> {
        let tree = self.parser.parse(source, file_path)?;
        let snapshot = self.analyzer.analyze(&tree)?;
        debug!(
            file = file_path,
            language = self.parser.language_name(),
            points = snapshot.points.len(),
            edges = snapshot.edges.len(),
            "flow graph built"
        );
        Ok(FlowGraphResult { tree, snapshot })
    }
}
