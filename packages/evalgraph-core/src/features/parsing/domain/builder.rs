//! Bottom-up construction of `SyntaxTree`s
//!
//! Children are pushed before their parents; `finish` derives the parent
//! links from `NodeKind::children` and rejects anything that is not a tree.

use super::node_kind::{NodeId, NodeKind};
use super::syntax_tree::{ParseError, SyntaxNode, SyntaxTree};
use crate::shared::models::{FlowGraphError, LineIndex, Result, Span};
use std::ops::Range;

pub struct SyntaxTreeBuilder {
    source: String,
    file_path: String,
    lines: LineIndex,
    nodes: Vec<SyntaxNode>,
    errors: Vec<ParseError>,
}

impl SyntaxTreeBuilder {
    pub fn new(source: impl Into<String>, file_path: impl Into<String>) -> Self {
        let source = source.into();
        let lines = LineIndex::new(&source);
        Self {
            source,
            file_path: file_path.into(),
            lines,
            nodes: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Add a node covering `byte_range` of the source
    pub fn push(&mut self, kind: NodeKind, byte_range: Range<usize>) -> NodeId {
        self.push_node(kind, byte_range, None)
    }

    /// Add a node lowered from a grammar node of kind `raw_kind`
    pub fn push_raw(
        &mut self,
        kind: NodeKind,
        byte_range: Range<usize>,
        raw_kind: &'static str,
    ) -> NodeId {
        self.push_node(kind, byte_range, Some(raw_kind))
    }

    fn push_node(
        &mut self,
        kind: NodeKind,
        byte_range: Range<usize>,
        raw_kind: Option<&'static str>,
    ) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let span = self.lines.span(byte_range.start, byte_range.end);
        self.nodes.push(SyntaxNode {
            kind,
            span,
            byte_range,
            parent: None,
            raw_kind,
        });
        id
    }

    pub fn add_error(&mut self, message: impl Into<String>, span: Span) {
        self.errors.push(ParseError {
            message: message.into(),
            span,
        });
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Link parents and freeze the tree rooted at `root`
    pub fn finish(mut self, root: NodeId) -> Result<SyntaxTree> {
        let count = self.nodes.len();
        if root.index() >= count {
            return Err(FlowGraphError::malformed(format!(
                "root {} out of range (builder has {} nodes)",
                root, count
            )));
        }

        for index in 0..count {
            let parent = NodeId::new(index);
            for child in self.nodes[index].kind.children() {
                if child.index() >= count {
                    return Err(FlowGraphError::malformed(format!(
                        "{} lists missing child {}",
                        parent, child
                    )));
                }
                if child == root {
                    return Err(FlowGraphError::malformed(format!(
                        "root {} listed as child of {}",
                        root, parent
                    )));
                }
                let slot = &mut self.nodes[child.index()].parent;
                if let Some(previous) = slot {
                    return Err(FlowGraphError::malformed(format!(
                        "{} has two parents: {} and {}",
                        child, previous, parent
                    )));
                }
                *slot = Some(parent);
            }
        }

        // Every node must hang off the root; this also rules out cycles.
        let mut reached = vec![false; count];
        let mut stack = vec![root];
        let mut seen = 0usize;
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut reached[id.index()], true) {
                continue;
            }
            seen += 1;
            stack.extend(self.nodes[id.index()].kind.children());
        }
        if seen != count {
            let orphan = reached.iter().position(|r| !r).unwrap_or_default();
            return Err(FlowGraphError::malformed(format!(
                "{} of {} nodes unreachable from root (first: #{})",
                count - seen,
                count,
                orphan
            )));
        }

        tracing::debug!(
            file = %self.file_path,
            nodes = count,
            errors = self.errors.len(),
            "syntax tree built"
        );
        Ok(SyntaxTree::from_parts(
            self.nodes,
            root,
            self.source,
            self.file_path,
            self.errors,
        ))
    }
}
