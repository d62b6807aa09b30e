//! Evaluation-order rule table
//!
//! Every node kind is one of three shapes:
//!
//! - **Operation**: evaluates its operand steps left to right, then applies.
//!   ENTRY(op) follows the completion of the last step (or the start of the
//!   op when it has no steps); EXIT(op) follows ENTRY(op).
//! - **Scope**: compilation unit, class, method. Inner flow starts at
//!   ENTRY(scope).
//! - **Pass-through**: blocks, statements and control constructs. Their
//!   ENTRY and EXIT are aliases of the canonical points around them and
//!   never show up in results.
//!
//! `child_incoming` and `construct_exit` hold the per-kind rules; they are
//! matched exhaustively so a new `NodeKind` cannot slip through without one.

use super::jumps::JumpKind;
use super::resolver::{retag, Edges, RawEdge, Resolver, Visit};
use crate::features::flow_graph::domain::{EdgeKind, Phase};
use crate::features::parsing::domain::{NodeId, NodeKind, SyntaxTree};
use crate::shared::models::{FlowGraphError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape {
    Operation,
    Scope,
    PassThrough,
}

pub(crate) fn shape_of(tree: &SyntaxTree, node: NodeId) -> Result<Shape> {
    use NodeKind::*;
    Ok(match &tree.get(node).kind {
        CompilationUnit { .. } | ClassDeclaration { .. } | MethodDeclaration { .. } => {
            Shape::Scope
        }
        Block { .. }
        | VariableDeclarations { .. }
        | ExpressionStatement { .. }
        | If { .. }
        | WhileLoop { .. }
        | DoWhileLoop { .. }
        | ForLoop { .. }
        | ForEachLoop { .. }
        | Switch { .. }
        | Case { .. }
        | Try { .. }
        | Catch { .. }
        | Labeled { .. }
        | Synchronized { .. }
        | Empty
        | Parentheses { .. }
        | Ternary { .. } => Shape::PassThrough,
        VariableDeclarator { .. }
        | Return { .. }
        | Throw { .. }
        | Yield { .. }
        | Break { .. }
        | Continue { .. }
        | Assert { .. }
        | Binary { .. }
        | Unary { .. }
        | Cast { .. }
        | InstanceOf { .. }
        | Assignment { .. }
        | MethodInvocation { .. }
        | NewClass { .. }
        | NewArray { .. }
        | ArrayInitializer { .. }
        | ArrayAccess { .. }
        | FieldAccess { .. }
        | Lambda { .. }
        | MethodReference
        | Identifier { .. }
        | Literal
        | This => Shape::Operation,
        Unsupported { raw_kind, .. } => {
            let span = tree.get(node).span;
            return Err(FlowGraphError::UnsupportedConstruct {
                kind: raw_kind.clone(),
                location: format!("{}:{}", tree.file_path(), span),
            });
        }
    })
}

/// Operand steps of an operation in runtime order
pub(crate) fn operation_steps(tree: &SyntaxTree, node: NodeId) -> Vec<NodeId> {
    use NodeKind::*;
    match &tree.get(node).kind {
        VariableDeclarator { initializer, .. } => initializer.iter().copied().collect(),
        Return { expression } => expression.iter().copied().collect(),
        Throw { expression } | Yield { expression } => vec![*expression],
        Assert { condition, detail } => std::iter::once(*condition).chain(*detail).collect(),
        Binary { left, right, .. } => vec![*left, *right],
        Unary { operand, .. } => vec![*operand],
        Cast { expression } | InstanceOf { expression } => vec![*expression],
        // value first, then whatever the write location needs evaluated
        Assignment { target, value, .. } => std::iter::once(*value)
            .chain(target_operands(tree, *target))
            .collect(),
        MethodInvocation {
            select, arguments, ..
        } => select.iter().copied().chain(arguments.iter().copied()).collect(),
        NewClass { arguments, .. } => arguments.clone(),
        NewArray {
            dimensions,
            initializer,
        } => dimensions.iter().copied().chain(*initializer).collect(),
        ArrayInitializer { elements } => elements.clone(),
        ArrayAccess { array, index } => vec![*array, *index],
        FieldAccess { target, .. } => vec![*target],
        // lambda bodies are opaque from outside
        _ => Vec::new(),
    }
}

/// Sub-expressions an assignment target evaluates: `a` and `i` of `a[i]`,
/// `o` of `o.f`; a plain name evaluates nothing
fn target_operands(tree: &SyntaxTree, target: NodeId) -> Vec<NodeId> {
    match &tree.get(target).kind {
        NodeKind::ArrayAccess { array, index } => vec![*array, *index],
        NodeKind::FieldAccess { target, .. } => vec![*target],
        NodeKind::Parentheses { expression } => target_operands(tree, *expression),
        _ => Vec::new(),
    }
}

/// The assignment whose write location is `node`, looking through
/// parentheses
pub(crate) fn write_owner(tree: &SyntaxTree, node: NodeId) -> Option<NodeId> {
    let mut node = node;
    loop {
        let parent = tree.get(node).parent?;
        match &tree.get(parent).kind {
            NodeKind::Assignment { target, .. } if *target == node => return Some(parent),
            NodeKind::Parentheses { .. } => node = parent,
            _ => return None,
        }
    }
}

/// `node` fills a statement slot of its parent rather than producing a value
pub(crate) fn in_statement_position(tree: &SyntaxTree, node: NodeId) -> bool {
    use NodeKind::*;
    let Some(parent) = tree.get(node).parent else {
        return false;
    };
    match &tree.get(parent).kind {
        Block { statements } | Case { body: statements, .. } => statements.contains(&node),
        Labeled { statement, .. } => *statement == node,
        If {
            then_branch,
            else_branch,
            ..
        } => *then_branch == node || *else_branch == Some(node),
        WhileLoop { body, .. }
        | DoWhileLoop { body, .. }
        | ForLoop { body, .. }
        | ForEachLoop { body, .. } => *body == node,
        _ => false,
    }
}

/// ENTRY/EXIT of this node can appear in query results
pub(crate) fn is_canonical(tree: &SyntaxTree, node: NodeId) -> bool {
    matches!(
        shape_of(tree, node),
        Ok(Shape::Operation) | Ok(Shape::Scope)
    ) && write_owner(tree, node).is_none()
}

/// Canonical nodes under `roots` in post-order, not looking inside nested
/// classes and lambdas
pub(crate) fn canonical_within(tree: &SyntaxTree, roots: &[NodeId]) -> Result<Vec<NodeId>> {
    let mut found = Vec::new();
    let mut stack: Vec<(NodeId, bool)> = roots.iter().rev().map(|&r| (r, false)).collect();
    while let Some((node, expanded)) = stack.pop() {
        let kind = &tree.get(node).kind;
        if expanded {
            let shape = shape_of(tree, node)?;
            if shape != Shape::PassThrough && write_owner(tree, node).is_none() {
                found.push(node);
            }
            continue;
        }
        stack.push((node, true));
        if !kind.is_flow_boundary() {
            for child in kind.children().into_iter().rev() {
                stack.push((child, false));
            }
        }
    }
    Ok(found)
}

impl<'a> Resolver<'a> {
    /// Where control comes from when `child` of `parent` begins
    pub(crate) fn child_incoming(&mut self, parent: NodeId, child: NodeId) -> Result<Edges> {
        use NodeKind::*;

        // operands of a write location are steps of the assignment
        if let Some(assignment) = write_owner(self.tree, parent) {
            let steps = operation_steps(self.tree, assignment);
            return self.sequence_incoming(assignment, &steps, child);
        }

        match self.kind(parent) {
            CompilationUnit { .. } | ClassDeclaration { .. } => Ok(vec![RawEdge::entry(parent)]),
            MethodDeclaration {
                parameters, body, ..
            } => {
                let sequence: Vec<NodeId> = parameters.iter().copied().chain(*body).collect();
                self.scoped_incoming(parent, &sequence, child)
            }
            Lambda { parameters, body } => {
                let sequence: Vec<NodeId> =
                    parameters.iter().copied().chain(Some(*body)).collect();
                self.scoped_incoming(parent, &sequence, child)
            }
            NewClass { body: Some(body), .. } if *body == child => {
                Ok(vec![RawEdge::entry(parent)])
            }
            Assignment { target, .. } if *target == child => {
                Err(FlowGraphError::NotAProgramPoint(
                    self.tree.print(self.tree.cursor_unchecked(child))?,
                ))
            }

            Block { statements: sequence }
            | VariableDeclarations {
                declarators: sequence,
            }
            | Case { body: sequence, .. } => self.sequence_incoming(parent, sequence, child),
            ExpressionStatement { .. } | Parentheses { .. } | Labeled { .. } => {
                self.start_preds(parent)
            }
            Synchronized { lock, body } => self.sequence_incoming(parent, &[*lock, *body], child),
            Catch { parameter, body } => self.sequence_incoming(parent, &[*parameter, *body], child),
            If {
                condition,
                then_branch,
                else_branch,
            } => self.branch_incoming(parent, *condition, *then_branch, *else_branch, child),
            Ternary {
                condition,
                then_value,
                else_value,
            } => self.branch_incoming(parent, *condition, *then_value, Some(*else_value), child),
            WhileLoop { condition, body } => {
                if child == *condition {
                    let mut edges = self.start_preds(parent)?;
                    edges.extend(retag(self.after_body(parent, *body)?, EdgeKind::LoopBack));
                    Ok(edges)
                } else if child == *body {
                    Ok(retag(self.completion(*condition)?, EdgeKind::TrueBranch))
                } else {
                    Err(self.not_a_child(parent, child))
                }
            }
            DoWhileLoop { body, condition } => {
                if child == *body {
                    let mut edges = self.start_preds(parent)?;
                    edges.extend(retag(self.completion(*condition)?, EdgeKind::LoopBack));
                    Ok(edges)
                } else if child == *condition {
                    self.after_body(parent, *body)
                } else {
                    Err(self.not_a_child(parent, child))
                }
            }
            ForLoop {
                init,
                condition,
                update,
                body,
            } => self.for_incoming(parent, init, *condition, update, *body, child),
            ForEachLoop {
                variable,
                iterable,
                body,
            } => {
                if child == *iterable {
                    self.start_preds(parent)
                } else if child == *variable {
                    let mut edges = self.completion(*iterable)?;
                    edges.extend(retag(self.after_body(parent, *body)?, EdgeKind::LoopBack));
                    Ok(edges)
                } else if child == *body {
                    self.completion(*variable)
                } else {
                    Err(self.not_a_child(parent, child))
                }
            }
            Switch { selector, cases } => {
                if child == *selector {
                    return self.start_preds(parent);
                }
                let index = self.position(parent, cases, child)?;
                let mut edges = retag(self.completion(*selector)?, EdgeKind::SwitchCase);
                if index > 0 {
                    let previous = cases[index - 1];
                    if !matches!(self.kind(previous), Case { arrow: true, .. }) {
                        edges.extend(retag(self.completion(previous)?, EdgeKind::Fallthrough));
                    }
                }
                Ok(edges)
            }
            Try {
                resources,
                body,
                catches,
                finally,
            } => {
                if let Some(index) = resources.iter().position(|&r| r == child) {
                    return match index {
                        0 => self.start_preds(parent),
                        i => self.completion(resources[i - 1]),
                    };
                }
                if child == *body {
                    return self.sequence_exit(parent, resources);
                }
                if catches.contains(&child) {
                    return self.exception_sources(parent);
                }
                if Some(child) == *finally {
                    let mut edges = self.completion(*body)?;
                    edges.extend(self.completions(catches)?);
                    edges.extend(self.crossing_jumps(parent)?);
                    return Ok(retag(edges, EdgeKind::Finally));
                }
                Err(self.not_a_child(parent, child))
            }

            VariableDeclarator { .. }
            | Return { .. }
            | Throw { .. }
            | Yield { .. }
            | Assert { .. }
            | Binary { .. }
            | Unary { .. }
            | Cast { .. }
            | InstanceOf { .. }
            | Assignment { .. }
            | MethodInvocation { .. }
            | NewClass { .. }
            | NewArray { .. }
            | ArrayInitializer { .. }
            | ArrayAccess { .. }
            | FieldAccess { .. } => {
                let steps = operation_steps(self.tree, parent);
                self.sequence_incoming(parent, &steps, child)
            }

            Break { .. }
            | Continue { .. }
            | Empty
            | MethodReference
            | Identifier { .. }
            | Literal
            | This => Err(self.not_a_child(parent, child)),
            Unsupported { .. } => shape_of(self.tree, parent).map(|_| Vec::new()),
        }
    }

    /// Join of the completions of a scope or pass-through construct
    pub(crate) fn construct_exit(&mut self, node: NodeId) -> Result<Edges> {
        use NodeKind::*;
        match self.kind(node) {
            CompilationUnit { members } => {
                if members.is_empty() {
                    Ok(vec![RawEdge::entry(node)])
                } else {
                    self.completions(members)
                }
            }
            // members run on their own; surrounding code sees the declaration
            // as a single step
            ClassDeclaration { .. } => Ok(vec![RawEdge::entry(node)]),
            MethodDeclaration {
                parameters, body, ..
            } => {
                let mut edges = match (body, parameters.last()) {
                    (Some(body), _) => self.completion(*body)?,
                    (None, Some(&last)) => self.completion(last)?,
                    (None, None) => vec![RawEdge::entry(node)],
                };
                edges.extend(self.landings(node, JumpKind::Return)?);
                edges.extend(self.landings(node, JumpKind::Throw)?);
                Ok(edges)
            }
            Block { statements: sequence }
            | VariableDeclarations {
                declarators: sequence,
            }
            | Case { body: sequence, .. } => self.sequence_exit(node, sequence),
            ExpressionStatement { expression } | Parentheses { expression } => {
                self.completion(*expression)
            }
            Synchronized { body, .. } | Catch { body, .. } => self.completion(*body),
            Labeled { statement, .. } => {
                let mut edges = self.completion(*statement)?;
                edges.extend(self.landings(node, JumpKind::Break)?);
                Ok(edges)
            }
            Empty => self.start_preds(node),
            If {
                condition,
                then_branch,
                else_branch,
            } => {
                let mut edges = self.completion(*then_branch)?;
                match else_branch {
                    Some(else_branch) => edges.extend(self.completion(*else_branch)?),
                    None => edges.extend(retag(
                        self.completion(*condition)?,
                        EdgeKind::FalseBranch,
                    )),
                }
                Ok(edges)
            }
            Ternary {
                then_value,
                else_value,
                ..
            } => self.completions(&[*then_value, *else_value]),
            WhileLoop { condition, .. } | DoWhileLoop { condition, .. } => {
                let mut edges = retag(self.completion(*condition)?, EdgeKind::FalseBranch);
                edges.extend(self.landings(node, JumpKind::Break)?);
                Ok(edges)
            }
            ForLoop { condition, .. } => {
                let mut edges = match condition {
                    Some(condition) => retag(self.completion(*condition)?, EdgeKind::FalseBranch),
                    None => Vec::new(),
                };
                edges.extend(self.landings(node, JumpKind::Break)?);
                Ok(edges)
            }
            ForEachLoop { iterable, body, .. } => {
                let mut edges = self.completion(*iterable)?;
                edges.extend(self.after_body(node, *body)?);
                let mut edges = retag(edges, EdgeKind::FalseBranch);
                edges.extend(self.landings(node, JumpKind::Break)?);
                Ok(edges)
            }
            Switch { selector, cases } => {
                let mut edges = Vec::new();
                let mut has_default = false;
                for (i, &case) in cases.iter().enumerate() {
                    let NodeKind::Case {
                        arrow, is_default, ..
                    } = self.kind(case)
                    else {
                        return Err(self.not_a_child(node, case));
                    };
                    has_default |= *is_default;
                    if *arrow || i + 1 == cases.len() {
                        edges.extend(self.completion(case)?);
                    }
                }
                // a switch expression without default must be exhaustive, so
                // only a statement can skip every case
                if !has_default && in_statement_position(self.tree, node) {
                    edges.extend(retag(self.completion(*selector)?, EdgeKind::SwitchCase));
                }
                edges.extend(self.landings(node, JumpKind::Break)?);
                edges.extend(self.landings(node, JumpKind::Yield)?);
                Ok(edges)
            }
            Try {
                body,
                catches,
                finally,
                ..
            } => match finally {
                Some(finally) => self.completion(*finally),
                None => {
                    let mut edges = self.completion(*body)?;
                    edges.extend(self.completions(catches)?);
                    Ok(edges)
                }
            },
            Unsupported { .. } => shape_of(self.tree, node).map(|_| Vec::new()),
            VariableDeclarator { .. }
            | Return { .. }
            | Throw { .. }
            | Yield { .. }
            | Break { .. }
            | Continue { .. }
            | Assert { .. }
            | Binary { .. }
            | Unary { .. }
            | Cast { .. }
            | InstanceOf { .. }
            | Assignment { .. }
            | MethodInvocation { .. }
            | NewClass { .. }
            | NewArray { .. }
            | ArrayInitializer { .. }
            | ArrayAccess { .. }
            | FieldAccess { .. }
            | Lambda { .. }
            | MethodReference
            | Identifier { .. }
            | Literal
            | This => Ok(vec![RawEdge::entry(node)]),
        }
    }

    /// `if`/ternary: condition, then one of two branches
    fn branch_incoming(
        &mut self,
        parent: NodeId,
        condition: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
        child: NodeId,
    ) -> Result<Edges> {
        if child == condition {
            self.start_preds(parent)
        } else if child == then_branch {
            Ok(retag(self.completion(condition)?, EdgeKind::TrueBranch))
        } else if Some(child) == else_branch {
            Ok(retag(self.completion(condition)?, EdgeKind::FalseBranch))
        } else {
            Err(self.not_a_child(parent, child))
        }
    }

    /// Body completion plus `continue`s of the loop
    fn after_body(&mut self, loop_node: NodeId, body: NodeId) -> Result<Edges> {
        let mut edges = self.completion(body)?;
        edges.extend(self.landings(loop_node, JumpKind::Continue)?);
        Ok(edges)
    }

    fn for_incoming(
        &mut self,
        parent: NodeId,
        init: &[NodeId],
        condition: Option<NodeId>,
        update: &[NodeId],
        body: NodeId,
        child: NodeId,
    ) -> Result<Edges> {
        if let Some(index) = init.iter().position(|&i| i == child) {
            return match index {
                0 => self.start_preds(parent),
                i => self.completion(init[i - 1]),
            };
        }
        if let Some(index) = update.iter().position(|&u| u == child) {
            return match index {
                0 => self.after_body(parent, body),
                i => self.completion(update[i - 1]),
            };
        }
        if Some(child) == condition {
            return self.for_head(parent, init, update, body);
        }
        if child == body {
            return match condition {
                Some(condition) => Ok(retag(self.completion(condition)?, EdgeKind::TrueBranch)),
                None => self.for_head(parent, init, update, body),
            };
        }
        Err(self.not_a_child(parent, child))
    }

    /// Control reaching the top of a `for` iteration: after the
    /// initializers, or around again after the updates
    fn for_head(
        &mut self,
        parent: NodeId,
        init: &[NodeId],
        update: &[NodeId],
        body: NodeId,
    ) -> Result<Edges> {
        let mut edges = self.sequence_exit(parent, init)?;
        let back = match update.last() {
            Some(&last) => self.completion(last)?,
            None => self.after_body(parent, body)?,
        };
        edges.extend(retag(back, EdgeKind::LoopBack));
        Ok(edges)
    }

    /// Every point of the resources and body may throw into a catch, and so
    /// may closing the resources after the body
    fn exception_sources(&mut self, try_node: NodeId) -> Result<Edges> {
        if !self.config.exception_edges {
            return Ok(Vec::new());
        }
        self.guarded(Visit::Exceptions(try_node), |r| {
            let NodeKind::Try {
                resources, body, ..
            } = r.kind(try_node)
            else {
                return Ok(Vec::new());
            };
            let roots: Vec<NodeId> = resources.iter().copied().chain(Some(*body)).collect();
            let sources = canonical_within(r.tree, &roots)?;
            if sources.is_empty() {
                // `try {}`: the handler can only see the state before it
                return Ok(retag(r.start_preds(try_node)?, EdgeKind::Exception));
            }
            let mut edges: Edges = sources
                .into_iter()
                .map(|node| RawEdge {
                    node,
                    phase: Phase::Entry,
                    kind: EdgeKind::Exception,
                })
                .collect();
            if !resources.is_empty() {
                // the implicit close() runs once the body completes
                edges.extend(retag(r.completion(*body)?, EdgeKind::Exception));
            }
            edges.extend(r.landings(try_node, JumpKind::Throw)?);
            Ok(edges)
        })
    }
}
