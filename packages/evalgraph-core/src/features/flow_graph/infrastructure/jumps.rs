//! Abrupt completion routing
//!
//! A jump lands on the construct it targets: the loop/switch for `break`,
//! the loop for `continue`, the method for `return`, the switch expression
//! for `yield`, and either a catching `try` or the method for `throw`. On the
//! way out it runs every `finally` it crosses, innermost first.

use super::resolver::{retag, Edges, RawEdge, Resolver, Visit};
use crate::features::flow_graph::domain::EdgeKind;
use crate::features::parsing::domain::{NodeId, NodeKind, SyntaxTree};
use crate::shared::models::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JumpKind {
    Break,
    Continue,
    Return,
    Throw,
    Yield,
}

impl JumpKind {
    pub fn of(kind: &NodeKind) -> Option<Self> {
        match kind {
            NodeKind::Break { .. } => Some(JumpKind::Break),
            NodeKind::Continue { .. } => Some(JumpKind::Continue),
            NodeKind::Return { .. } => Some(JumpKind::Return),
            NodeKind::Throw { .. } => Some(JumpKind::Throw),
            NodeKind::Yield { .. } => Some(JumpKind::Yield),
            _ => None,
        }
    }
}

/// Where a jump goes and which `try ... finally` statements it leaves
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct JumpRoute {
    pub target: Option<NodeId>,
    /// Innermost first
    pub crossed: Vec<NodeId>,
}

/// Route of `jump`; `catch_throws` lets a `try` with catch clauses stop a
/// `throw` raised in its resources or body
pub(crate) fn route(tree: &SyntaxTree, jump: NodeId, catch_throws: bool) -> JumpRoute {
    let kind = &tree.get(jump).kind;
    let mut crossed = Vec::new();
    let Some(jump_kind) = JumpKind::of(kind) else {
        return JumpRoute {
            target: None,
            crossed,
        };
    };
    let label = match kind {
        NodeKind::Break { label } | NodeKind::Continue { label } => label.as_deref(),
        _ => None,
    };

    let mut child = jump;
    while let Some(parent) = tree.get(child).parent {
        let parent_kind = &tree.get(parent).kind;

        if let NodeKind::Try {
            resources,
            body,
            catches,
            finally,
        } = parent_kind
        {
            let guarded = child == *body || resources.contains(&child);
            if jump_kind == JumpKind::Throw && catch_throws && guarded && !catches.is_empty() {
                return JumpRoute {
                    target: Some(parent),
                    crossed,
                };
            }
            if finally.is_some() && Some(child) != *finally {
                crossed.push(parent);
            }
        }

        let found = match (jump_kind, label) {
            (JumpKind::Break, None) => {
                parent_kind.is_loop() || matches!(parent_kind, NodeKind::Switch { .. })
            }
            (JumpKind::Break, Some(wanted)) => {
                matches!(parent_kind, NodeKind::Labeled { label, .. } if label == wanted)
            }
            (JumpKind::Continue, None) => parent_kind.is_loop(),
            (JumpKind::Continue, Some(wanted)) => {
                parent_kind.is_loop()
                    && tree.get(parent).parent.is_some_and(|grand| {
                        matches!(
                            &tree.get(grand).kind,
                            NodeKind::Labeled { label, .. } if label == wanted
                        )
                    })
            }
            (JumpKind::Return | JumpKind::Throw, _) => matches!(
                parent_kind,
                NodeKind::MethodDeclaration { .. } | NodeKind::Lambda { .. }
            ),
            (JumpKind::Yield, _) => matches!(parent_kind, NodeKind::Switch { .. }),
        };
        if found {
            return JumpRoute {
                target: Some(parent),
                crossed,
            };
        }
        if parent_kind.is_flow_boundary() {
            break;
        }
        child = parent;
    }
    JumpRoute {
        target: None,
        crossed,
    }
}

/// Jumps under `roots` (optionally of one kind), not looking inside nested
/// classes and lambdas
pub(crate) fn jumps_within(
    tree: &SyntaxTree,
    roots: &[NodeId],
    only: Option<JumpKind>,
) -> Vec<NodeId> {
    let mut found = Vec::new();
    let mut stack: Vec<NodeId> = roots.iter().rev().copied().collect();
    while let Some(node) = stack.pop() {
        let kind = &tree.get(node).kind;
        if let Some(jump) = JumpKind::of(kind) {
            if only.map_or(true, |k| k == jump) {
                found.push(node);
            }
        }
        let is_root = roots.contains(&node);
        if is_root || !kind.is_flow_boundary() {
            for child in kind.children().into_iter().rev() {
                stack.push(child);
            }
        }
    }
    found
}

fn finally_of(tree: &SyntaxTree, try_node: NodeId) -> Option<NodeId> {
    match &tree.get(try_node).kind {
        NodeKind::Try { finally, .. } => *finally,
        _ => None,
    }
}

impl<'a> Resolver<'a> {
    /// Jumps of `kind` landing on `target`, as seen from `target`
    pub(crate) fn landings(&mut self, target: NodeId, kind: JumpKind) -> Result<Edges> {
        self.guarded(Visit::Landing(target, kind), |r| {
            let mut edges = Vec::new();
            for jump in jumps_within(r.tree, &[target], Some(kind)) {
                let route = route(r.tree, jump, r.config.exception_edges);
                if route.target != Some(target) {
                    continue;
                }
                match route.crossed.last() {
                    None => edges.push(RawEdge::exit(jump).with_kind(EdgeKind::Jump)),
                    Some(&outermost) => {
                        if let Some(finally) = finally_of(r.tree, outermost) {
                            edges.extend(retag(r.completion(finally)?, EdgeKind::Jump));
                        }
                    }
                }
            }
            Ok(edges)
        })
    }

    /// Jumps leaving `try_node` that enter its `finally` block
    pub(crate) fn crossing_jumps(&mut self, try_node: NodeId) -> Result<Edges> {
        self.guarded(Visit::Crossing(try_node), |r| {
            let NodeKind::Try {
                resources,
                body,
                catches,
                ..
            } = r.kind(try_node)
            else {
                return Ok(Vec::new());
            };
            let roots: Vec<NodeId> = resources
                .iter()
                .copied()
                .chain(Some(*body))
                .chain(catches.iter().copied())
                .collect();

            let mut edges = Vec::new();
            for jump in jumps_within(r.tree, &roots, None) {
                let route = route(r.tree, jump, r.config.exception_edges);
                let Some(position) = route.crossed.iter().position(|&t| t == try_node) else {
                    continue;
                };
                if position == 0 {
                    edges.push(RawEdge::exit(jump).with_kind(EdgeKind::Jump));
                } else if let Some(inner) = finally_of(r.tree, route.crossed[position - 1]) {
                    edges.extend(retag(r.completion(inner)?, EdgeKind::Jump));
                }
            }
            Ok(edges)
        })
    }
}
