//! Successor index
//!
//! Inverts the predecessor relation of every canonical point. Pass-through
//! points get the canonical points whose resolution went through them, so
//! `next_from(ENTRY(block))` answers the first operation inside the block.

use rustc_hash::FxHashMap;
use tracing::debug;

use super::data_flow_graph::DataFlowGraph;
use crate::features::flow_graph::domain::ProgramPoint;
use crate::shared::models::Result;

#[derive(Debug, Default)]
pub(crate) struct SuccessorIndex {
    successors: FxHashMap<ProgramPoint, Vec<ProgramPoint>>,
}

impl SuccessorIndex {
    pub(crate) fn build(graph: &DataFlowGraph<'_>) -> Result<Self> {
        let resolved = graph.resolve_all()?;

        let mut successors: FxHashMap<ProgramPoint, Vec<ProgramPoint>> = FxHashMap::default();
        for (point, resolution) in &resolved {
            for edge in &resolution.edges {
                successors.entry(edge.from).or_default().push(*point);
            }
            for alias in &resolution.aliases {
                successors.entry(*alias).or_default().push(*point);
            }
        }
        for targets in successors.values_mut() {
            targets.sort();
            targets.dedup();
        }

        debug!(
            points = resolved.len(),
            sources = successors.len(),
            "successor index built"
        );
        Ok(Self { successors })
    }

    pub(crate) fn get(&self, point: &ProgramPoint) -> &[ProgramPoint] {
        self.successors
            .get(point)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.successors.len()
    }
}
