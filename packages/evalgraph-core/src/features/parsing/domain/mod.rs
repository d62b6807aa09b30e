//! Parsing domain models

mod builder;
mod node_kind;
mod syntax_tree;

pub use builder::SyntaxTreeBuilder;
pub use node_kind::{NodeId, NodeKind};
pub use syntax_tree::{Cursor, ParseError, SyntaxNode, SyntaxTree, TreeId};
