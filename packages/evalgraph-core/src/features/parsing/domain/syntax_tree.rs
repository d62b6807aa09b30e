//! Immutable syntax tree arena and cursors into it

use super::node_kind::{NodeId, NodeKind};
use crate::shared::models::{FlowGraphError, Result, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of one `SyntaxTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TreeId(u64);

impl TreeId {
    pub(crate) fn fresh() -> Self {
        Self(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// One node occurrence in one tree
///
/// Equality is occurrence identity: two structurally identical `f()` calls
/// at different positions have different cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cursor {
    pub tree: TreeId,
    pub node: NodeId,
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.node, self.tree.0)
    }
}

/// Parser diagnostic attached to a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseError {
    pub message: String,
    pub span: Span,
}

/// Arena entry
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub kind: NodeKind,
    pub span: Span,
    pub byte_range: Range<usize>,
    pub parent: Option<NodeId>,
    /// Grammar node kind this node was lowered from, if any
    pub raw_kind: Option<&'static str>,
}

/// Immutable tree of `SyntaxNode`s with parent links
#[derive(Debug)]
pub struct SyntaxTree {
    id: TreeId,
    nodes: Vec<SyntaxNode>,
    root: NodeId,
    source: String,
    file_path: String,
    errors: Vec<ParseError>,
}

impl SyntaxTree {
    /// Only `SyntaxTreeBuilder::finish` constructs trees; it has already
    /// checked the parent links.
    pub(crate) fn from_parts(
        nodes: Vec<SyntaxNode>,
        root: NodeId,
        source: String,
        file_path: String,
        errors: Vec<ParseError>,
    ) -> Self {
        Self {
            id: TreeId::fresh(),
            nodes,
            root,
            source,
            file_path,
            errors,
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> Cursor {
        self.cursor_unchecked(self.root)
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Cursor for an arena id of this tree
    pub fn cursor(&self, node: NodeId) -> Result<Cursor> {
        if node.index() < self.nodes.len() {
            Ok(self.cursor_unchecked(node))
        } else {
            Err(FlowGraphError::malformed(format!(
                "node {} out of range (tree has {} nodes)",
                node,
                self.nodes.len()
            )))
        }
    }

    pub(crate) fn cursor_unchecked(&self, node: NodeId) -> Cursor {
        Cursor {
            tree: self.id,
            node,
        }
    }

    /// Whether `cursor` points into this tree
    pub fn contains(&self, cursor: Cursor) -> bool {
        cursor.tree == self.id && cursor.node.index() < self.nodes.len()
    }

    /// Reject cursors of other trees
    pub fn check(&self, cursor: Cursor) -> Result<NodeId> {
        if self.contains(cursor) {
            Ok(cursor.node)
        } else {
            Err(FlowGraphError::UnknownCursor {
                cursor: cursor.to_string(),
                tree: self.id.0,
            })
        }
    }

    pub fn node(&self, cursor: Cursor) -> Result<&SyntaxNode> {
        let id = self.check(cursor)?;
        Ok(self.get(id))
    }

    pub fn kind(&self, cursor: Cursor) -> Result<&NodeKind> {
        Ok(&self.node(cursor)?.kind)
    }

    /// Arena access for ids handed out by this tree
    pub(crate) fn get(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    pub fn parent(&self, cursor: Cursor) -> Result<Option<Cursor>> {
        let node = self.node(cursor)?;
        Ok(node.parent.map(|p| self.cursor_unchecked(p)))
    }

    /// Ancestors from the parent up to the root
    pub fn ancestors(&self, cursor: Cursor) -> Result<Vec<Cursor>> {
        let mut current = self.check(cursor)?;
        let mut chain = Vec::new();
        while let Some(parent) = self.get(current).parent {
            chain.push(self.cursor_unchecked(parent));
            current = parent;
        }
        Ok(chain)
    }

    pub fn children(&self, cursor: Cursor) -> Result<Vec<Cursor>> {
        let node = self.node(cursor)?;
        Ok(node
            .kind
            .children()
            .into_iter()
            .map(|c| self.cursor_unchecked(c))
            .collect())
    }

    /// Original source text of a node
    pub fn text(&self, cursor: Cursor) -> Result<&str> {
        let node = self.node(cursor)?;
        Ok(self.slice(node))
    }

    fn slice(&self, node: &SyntaxNode) -> &str {
        self.source.get(node.byte_range.clone()).unwrap_or_default()
    }

    /// Source text of a node with whitespace runs collapsed to one space
    pub fn print(&self, cursor: Cursor) -> Result<String> {
        let node = self.node(cursor)?;
        Ok(normalize_whitespace(self.slice(node)))
    }

    /// First node in post-order whose printed text equals `snippet`
    /// (whitespace-normalised on both sides)
    pub fn find_program_point(&self, snippet: &str) -> Option<Cursor> {
        let wanted = normalize_whitespace(snippet);
        self.post_order()
            .into_iter()
            .find(|&id| normalize_whitespace(self.slice(self.get(id))) == wanted)
            .map(|id| self.cursor_unchecked(id))
    }

    /// Like `find_program_point`, but every match in post-order
    pub fn find_all(&self, snippet: &str) -> Vec<Cursor> {
        let wanted = normalize_whitespace(snippet);
        self.post_order()
            .into_iter()
            .filter(|&id| normalize_whitespace(self.slice(self.get(id))) == wanted)
            .map(|id| self.cursor_unchecked(id))
            .collect()
    }

    /// All node ids, children before parents, siblings left to right
    pub fn post_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            for child in self.get(id).kind.children().into_iter().rev() {
                stack.push((child, false));
            }
        }
        order
    }

    /// All node ids, parents before children
    pub fn pre_order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.get(id).kind.children().into_iter().rev() {
                stack.push(child);
            }
        }
        order
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
