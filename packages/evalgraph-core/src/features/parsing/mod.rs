//! Parsing Feature
//!
//! Turns Java source into the immutable `SyntaxTree` the flow graph runs on.
//!
//! ## Structure
//! - `domain/` - SyntaxTree arena, NodeKind, Cursor, builder
//! - `ports/` - Parser trait
//! - `application/` - ParseFileUseCase
//! - `infrastructure/` - TreeSitterParser (Java lowering)

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

// Re-exports
pub use application::ParseFileUseCase;
pub use domain::{Cursor, NodeId, NodeKind, SyntaxNode, SyntaxTree, SyntaxTreeBuilder, TreeId};
pub use infrastructure::TreeSitterParser;
pub use ports::Parser;
