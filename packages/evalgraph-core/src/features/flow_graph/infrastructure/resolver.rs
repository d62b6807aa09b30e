//! Predecessor resolver
//!
//! One `Resolver` answers one query. Every construct is reduced to four
//! questions, each answered from the parent's rule:
//!
//! - `start_preds(n)`: canonical points control comes from when `n` begins
//! - `completion(n)`: canonical points at which `n` finishes normally
//! - `entry_preds(n)` / `exit_preds(n)`: the query itself
//!
//! Results are unions, so each sub-question only has to be answered once per
//! query. The visited set doubles as cycle breaker for loops whose
//! pass-through parts refer back to themselves (`for (;;) {}`), and as the
//! record of which pass-through aliases a query went through.

use rustc_hash::FxHashSet;

use super::evaluation_order::{shape_of, operation_steps, Shape};
use super::jumps::JumpKind;
use crate::config::FlowGraphConfig;
use crate::features::flow_graph::domain::{EdgeKind, Phase};
use crate::features::parsing::domain::{NodeId, NodeKind, SyntaxTree};
use crate::shared::limits::ensure_stack;
use crate::shared::models::{FlowGraphError, Result};

/// Predecessor edge before it is turned into a `ProgramPoint`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RawEdge {
    pub node: NodeId,
    pub phase: Phase,
    pub kind: EdgeKind,
}

impl RawEdge {
    pub(crate) fn entry(node: NodeId) -> Self {
        Self {
            node,
            phase: Phase::Entry,
            kind: EdgeKind::Sequential,
        }
    }

    pub(crate) fn exit(node: NodeId) -> Self {
        Self {
            node,
            phase: Phase::Exit,
            kind: EdgeKind::Sequential,
        }
    }

    pub(crate) fn with_kind(mut self, kind: EdgeKind) -> Self {
        self.kind = kind;
        self
    }
}

pub(crate) type Edges = Vec<RawEdge>;

/// Tag plain sequential edges with `kind`; edges an inner rule already
/// classified keep their kind
pub(crate) fn retag(mut edges: Edges, kind: EdgeKind) -> Edges {
    for edge in &mut edges {
        if edge.kind == EdgeKind::Sequential {
            edge.kind = kind;
        }
    }
    edges
}

/// Sub-question already answered in the current query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Visit {
    Start(NodeId),
    Exit(NodeId),
    Landing(NodeId, JumpKind),
    Crossing(NodeId),
    Exceptions(NodeId),
}

pub(crate) struct Resolver<'a> {
    pub(crate) tree: &'a SyntaxTree,
    pub(crate) config: &'a FlowGraphConfig,
    visited: FxHashSet<Visit>,
    depth: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(tree: &'a SyntaxTree, config: &'a FlowGraphConfig) -> Self {
        Self {
            tree,
            config,
            visited: FxHashSet::default(),
            depth: 0,
        }
    }

    /// Predecessors of `(node, phase)`, first occurrence of each point kept
    pub(crate) fn predecessors(&mut self, node: NodeId, phase: Phase) -> Result<Edges> {
        let edges = match phase {
            Phase::Entry => self.entry_preds(node)?,
            Phase::Exit => self.exit_preds(node)?,
        };
        let mut seen = FxHashSet::default();
        Ok(edges
            .into_iter()
            .filter(|e| seen.insert((e.node, e.phase)))
            .collect())
    }

    pub(crate) fn into_visited(self) -> FxHashSet<Visit> {
        self.visited
    }

    /// Run `f` unless `visit` was already answered in this query
    pub(crate) fn guarded(
        &mut self,
        visit: Visit,
        f: impl FnOnce(&mut Self) -> Result<Edges>,
    ) -> Result<Edges> {
        if !self.visited.insert(visit) {
            return Ok(Vec::new());
        }
        self.depth += 1;
        if self.depth > self.config.max_resolution_depth {
            return Err(FlowGraphError::ResolutionDepthExceeded {
                limit: self.config.max_resolution_depth,
            });
        }
        // every nested construct passes through here once per level
        let result = ensure_stack(|| f(self));
        self.depth -= 1;
        result
    }

    pub(crate) fn kind(&self, node: NodeId) -> &'a NodeKind {
        let tree: &'a SyntaxTree = self.tree;
        &tree.get(node).kind
    }

    pub(crate) fn entry_preds(&mut self, node: NodeId) -> Result<Edges> {
        match shape_of(self.tree, node)? {
            Shape::Operation => {
                let steps = operation_steps(self.tree, node);
                let Some(&last) = steps.last() else {
                    return self.start_preds(node);
                };
                let mut edges = self.completion(last)?;
                if let NodeKind::Binary { operator, left, .. } = self.kind(node) {
                    if self.config.short_circuit_edges && matches!(operator.as_str(), "&&" | "||")
                    {
                        edges.extend(retag(self.completion(*left)?, EdgeKind::ShortCircuit));
                    }
                }
                Ok(edges)
            }
            Shape::Scope | Shape::PassThrough => self.start_preds(node),
        }
    }

    pub(crate) fn exit_preds(&mut self, node: NodeId) -> Result<Edges> {
        match shape_of(self.tree, node)? {
            Shape::Operation => Ok(vec![RawEdge::entry(node)]),
            Shape::Scope | Shape::PassThrough => {
                self.guarded(Visit::Exit(node), |r| r.construct_exit(node))
            }
        }
    }

    /// Where control comes from when `node` begins
    pub(crate) fn start_preds(&mut self, node: NodeId) -> Result<Edges> {
        self.guarded(Visit::Start(node), |r| match r.tree.get(node).parent {
            // only the compilation unit has no parent
            None => Ok(Vec::new()),
            Some(parent) => r.child_incoming(parent, node),
        })
    }

    /// Canonical points at which `node` finishes normally
    pub(crate) fn completion(&mut self, node: NodeId) -> Result<Edges> {
        match shape_of(self.tree, node)? {
            Shape::Operation if self.kind(node).is_jump() => Ok(Vec::new()),
            Shape::Operation | Shape::Scope => Ok(vec![RawEdge::exit(node)]),
            Shape::PassThrough => self.exit_preds(node),
        }
    }

    /// Union of the completions of `nodes`
    pub(crate) fn completions(&mut self, nodes: &[NodeId]) -> Result<Edges> {
        let mut edges = Vec::new();
        for &node in nodes {
            edges.extend(self.completion(node)?);
        }
        Ok(edges)
    }

    /// `child` runs after its predecessor in `sequence`; the first element
    /// starts where `parent` starts
    pub(crate) fn sequence_incoming(
        &mut self,
        parent: NodeId,
        sequence: &[NodeId],
        child: NodeId,
    ) -> Result<Edges> {
        match self.position(parent, sequence, child)? {
            0 => self.start_preds(parent),
            i => self.completion(sequence[i - 1]),
        }
    }

    /// Like `sequence_incoming`, but the first element starts at ENTRY of
    /// the enclosing scope
    pub(crate) fn scoped_incoming(
        &mut self,
        scope: NodeId,
        sequence: &[NodeId],
        child: NodeId,
    ) -> Result<Edges> {
        match self.position(scope, sequence, child)? {
            0 => Ok(vec![RawEdge::entry(scope)]),
            i => self.completion(sequence[i - 1]),
        }
    }

    /// Completion of the last element, or the start of `parent` if empty
    pub(crate) fn sequence_exit(&mut self, parent: NodeId, sequence: &[NodeId]) -> Result<Edges> {
        match sequence.last() {
            Some(&last) => self.completion(last),
            None => self.start_preds(parent),
        }
    }

    pub(crate) fn position(&self, parent: NodeId, sequence: &[NodeId], child: NodeId) -> Result<usize> {
        sequence
            .iter()
            .position(|&c| c == child)
            .ok_or_else(|| self.not_a_child(parent, child))
    }

    pub(crate) fn not_a_child(&self, parent: NodeId, child: NodeId) -> FlowGraphError {
        FlowGraphError::malformed(format!(
            "{} ({}) claims parent {} ({}) which does not contain it",
            child,
            self.kind(child).name(),
            parent,
            self.kind(parent).name()
        ))
    }
}
