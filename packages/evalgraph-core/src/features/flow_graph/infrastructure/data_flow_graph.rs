//! Data flow graph over one syntax tree
//!
//! Nothing is computed up front: every query walks the rule of the queried
//! node's parent (and, for pass-through constructs, of their parents) until
//! it reaches canonical points. Results are memoized per point in a
//! `DashMap`, so the graph can be shared by reference across threads.
//!
//! ```rust,ignore
//! let tree = TreeSitterParser::java().parse(source, "A.java")?;
//! let graph = DataFlowGraph::new(&tree)?;
//! let call = tree.find_program_point("b()").unwrap();
//! for point in graph.previous_in(call, Phase::Entry)? {
//!     println!("{} {}", point.phase, tree.print(point.cursor)?);
//! }
//! ```

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use std::sync::Arc;
use tracing::{debug, trace};

use super::evaluation_order::{is_canonical, shape_of, write_owner, Shape};
use super::resolver::{Resolver, Visit};
use super::successor_index::SuccessorIndex;
use crate::config::{FlowGraphConfig, Validatable};
use crate::features::flow_graph::domain::{FlowEdge, Phase, ProgramPoint};
use crate::features::parsing::domain::{Cursor, NodeId, NodeKind, SyntaxTree};
use crate::shared::models::{FlowGraphError, Result};

/// Cache size snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Memoized predecessor results
    pub entries: usize,
    /// Points with an entry in the successor index; 0 until it is built
    pub successor_sources: usize,
}

/// One resolved query: the canonical predecessors plus the pass-through
/// points the resolver went through on the way
pub(crate) struct Resolution {
    pub edges: Vec<FlowEdge>,
    pub aliases: Vec<ProgramPoint>,
}

pub struct DataFlowGraph<'t> {
    tree: &'t SyntaxTree,
    config: FlowGraphConfig,
    cache: DashMap<ProgramPoint, Arc<Vec<FlowEdge>>>,
    successors: OnceCell<SuccessorIndex>,
}

impl<'t> DataFlowGraph<'t> {
    /// Graph with the default (`standard`) configuration
    pub fn new(tree: &'t SyntaxTree) -> Result<Self> {
        Self::with_config(tree, FlowGraphConfig::default())
    }

    pub fn with_config(tree: &'t SyntaxTree, config: FlowGraphConfig) -> Result<Self> {
        config.validate()?;
        let root = tree.kind(tree.root())?;
        if !matches!(root, NodeKind::CompilationUnit { .. }) {
            return Err(FlowGraphError::MissingCompilationUnit(root.name().to_string()));
        }
        debug!(
            file = tree.file_path(),
            nodes = tree.len(),
            preset = %config.preset,
            "data flow graph ready"
        );
        Ok(Self {
            tree,
            config,
            cache: DashMap::new(),
            successors: OnceCell::new(),
        })
    }

    pub fn tree(&self) -> &'t SyntaxTree {
        self.tree
    }

    pub fn config(&self) -> &FlowGraphConfig {
        &self.config
    }

    /// Immediate predecessors of `(cursor, phase)`
    pub fn previous_in(&self, cursor: Cursor, phase: Phase) -> Result<Vec<ProgramPoint>> {
        self.predecessors(ProgramPoint::new(cursor, phase))
    }

    pub fn predecessors(&self, point: ProgramPoint) -> Result<Vec<ProgramPoint>> {
        Ok(self
            .incoming_edges(point)?
            .into_iter()
            .map(|edge| edge.from)
            .collect())
    }

    /// Predecessors together with the reason control flows along each edge
    pub fn incoming_edges(&self, point: ProgramPoint) -> Result<Vec<FlowEdge>> {
        let node = self.check_point(point)?;

        if self.config.cache_results {
            if let Some(hit) = self.cache.get(&point) {
                return Ok(hit.value().as_ref().clone());
            }
        }

        let Resolution { edges, .. } = self.resolve(node, point.phase)?;
        trace!(point = %point, predecessors = edges.len(), "resolved");
        if self.config.cache_results {
            self.cache.insert(point, Arc::new(edges.clone()));
        }
        Ok(edges)
    }

    /// Immediate successors of `(cursor, phase)`
    pub fn next_from(&self, cursor: Cursor, phase: Phase) -> Result<Vec<ProgramPoint>> {
        self.successors(ProgramPoint::new(cursor, phase))
    }

    /// Inverse of `predecessors`; the first call builds the successor index
    /// over the whole tree
    pub fn successors(&self, point: ProgramPoint) -> Result<Vec<ProgramPoint>> {
        self.check_point(point)?;
        Ok(self.successor_index()?.get(&point).to_vec())
    }

    /// Every canonical point, children before parents, ENTRY before EXIT
    pub fn program_points(&self) -> Vec<ProgramPoint> {
        let mut points = Vec::new();
        for node in self.modelled_nodes() {
            if is_canonical(self.tree, node) {
                let cursor = self.tree.cursor_unchecked(node);
                points.push(ProgramPoint::entry(cursor));
                points.push(ProgramPoint::exit(cursor));
            }
        }
        points
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            entries: self.cache.len(),
            successor_sources: self.successors.get().map_or(0, SuccessorIndex::len),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Post-order node ids, leaving out unsupported constructs and
    /// everything under them
    fn modelled_nodes(&self) -> Vec<NodeId> {
        self.tree
            .post_order()
            .into_iter()
            .filter(|&node| {
                let mut current = Some(node);
                while let Some(id) = current {
                    let entry = self.tree.get(id);
                    if matches!(entry.kind, NodeKind::Unsupported { .. }) {
                        return false;
                    }
                    current = entry.parent;
                }
                true
            })
            .collect()
    }

    fn check_point(&self, point: ProgramPoint) -> Result<NodeId> {
        let node = self.tree.check(point.cursor)?;
        if write_owner(self.tree, node).is_some() {
            return Err(FlowGraphError::NotAProgramPoint(
                self.tree.print(point.cursor)?,
            ));
        }
        Ok(node)
    }

    pub(crate) fn resolve(&self, node: NodeId, phase: Phase) -> Result<Resolution> {
        let mut resolver = Resolver::new(self.tree, &self.config);
        let raw = resolver.predecessors(node, phase)?;
        let edges = raw
            .into_iter()
            .map(|edge| FlowEdge {
                from: ProgramPoint::new(self.tree.cursor_unchecked(edge.node), edge.phase),
                kind: edge.kind,
            })
            .collect();

        let mut aliases = Vec::new();
        for visit in resolver.into_visited() {
            let (id, phase) = match visit {
                Visit::Start(id) => (id, Phase::Entry),
                Visit::Exit(id) => (id, Phase::Exit),
                _ => continue,
            };
            if matches!(shape_of(self.tree, id), Ok(Shape::PassThrough)) {
                aliases.push(ProgramPoint::new(self.tree.cursor_unchecked(id), phase));
            }
        }
        Ok(Resolution { edges, aliases })
    }

    /// Canonical points of the tree with their resolutions
    ///
    /// A point whose predecessors run into an unsupported construct is left
    /// out, so one unknown statement does not hide the rest of the file from
    /// the successor index. Any other failure aborts.
    pub(crate) fn resolve_all(&self) -> Result<Vec<(ProgramPoint, Resolution)>> {
        let points = self.program_points();
        let resolve_point = |&point: &ProgramPoint| {
            match self.resolve(point.cursor.node, point.phase) {
                Ok(resolution) => Some(Ok((point, resolution))),
                Err(FlowGraphError::UnsupportedConstruct { kind, location }) => {
                    debug!(%point, kind = %kind, location = %location, "point skipped");
                    None
                }
                Err(e) => Some(Err(e)),
            }
        };

        #[cfg(feature = "parallel")]
        let resolved = {
            use rayon::prelude::*;
            points
                .par_iter()
                .filter_map(resolve_point)
                .collect::<Result<Vec<_>>>()
        };

        #[cfg(not(feature = "parallel"))]
        let resolved = points
            .iter()
            .filter_map(resolve_point)
            .collect::<Result<Vec<_>>>();

        resolved
    }

    /// Built outside the cell so rayon workers never block on it; a racing
    /// second build produces the same index and is dropped
    fn successor_index(&self) -> Result<&SuccessorIndex> {
        if let Some(index) = self.successors.get() {
            return Ok(index);
        }
        let index = SuccessorIndex::build(self)?;
        Ok(self.successors.get_or_init(|| index))
    }
}
