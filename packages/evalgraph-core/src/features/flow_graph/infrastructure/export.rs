//! Whole-graph export: petgraph for algorithms, a serde snapshot for humans

use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::data_flow_graph::DataFlowGraph;
use crate::features::flow_graph::domain::{EdgeKind, Phase, ProgramPoint};
use crate::shared::models::{Result, Span};

/// Serializable listing of every canonical point and predecessor edge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraphSnapshot {
    pub file_path: String,
    pub points: Vec<PointRecord>,
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    /// Index into `points`
    pub id: usize,
    /// Arena index of the node
    pub node: usize,
    pub phase: Phase,
    pub kind: String,
    pub span: Span,
    /// Whitespace-normalised source of the node
    pub text: String,
}

/// `from` precedes `to`; both index into `points`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
}

impl FlowGraphSnapshot {
    pub fn point(&self, id: usize) -> Option<&PointRecord> {
        self.points.get(id)
    }

    /// Edges into the point with the given printed text and phase
    pub fn edges_into(&self, text: &str, phase: Phase) -> Vec<&EdgeRecord> {
        self.edges
            .iter()
            .filter(|e| {
                self.points
                    .get(e.to)
                    .is_some_and(|p| p.text == text && p.phase == phase)
            })
            .collect()
    }
}

impl<'t> DataFlowGraph<'t> {
    /// Predecessor relation as a petgraph graph (edges point forward in
    /// execution order)
    pub fn to_digraph(&self) -> Result<DiGraph<ProgramPoint, EdgeKind>> {
        let points = self.program_points();
        let mut graph = DiGraph::with_capacity(points.len(), points.len());
        let mut index: FxHashMap<ProgramPoint, NodeIndex> = FxHashMap::default();
        for &point in &points {
            index.insert(point, graph.add_node(point));
        }

        for &point in &points {
            let to = index[&point];
            for edge in self.incoming_edges(point)? {
                let from = *index
                    .entry(edge.from)
                    .or_insert_with(|| graph.add_node(edge.from));
                graph.add_edge(from, to, edge.kind);
            }
        }
        Ok(graph)
    }

    pub fn snapshot(&self) -> Result<FlowGraphSnapshot> {
        let tree = self.tree();
        let points = self.program_points();
        let ids: FxHashMap<ProgramPoint, usize> =
            points.iter().enumerate().map(|(id, &p)| (p, id)).collect();

        let mut records = Vec::with_capacity(points.len());
        for (id, point) in points.iter().enumerate() {
            let node = tree.node(point.cursor)?;
            records.push(PointRecord {
                id,
                node: point.cursor.node.index(),
                phase: point.phase,
                kind: node.kind.name().to_string(),
                span: node.span,
                text: tree.print(point.cursor)?,
            });
        }

        let mut edges = Vec::new();
        for (to, &point) in points.iter().enumerate() {
            for edge in self.incoming_edges(point)? {
                if let Some(&from) = ids.get(&edge.from) {
                    edges.push(EdgeRecord {
                        from,
                        to,
                        kind: edge.kind,
                    });
                }
            }
        }

        Ok(FlowGraphSnapshot {
            file_path: tree.file_path().to_string(),
            points: records,
            edges,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot()?)?)
    }
}
