//! Features
//!
//! - `parsing` - Java source to `SyntaxTree`
//! - `flow_graph` - evaluation-order data flow over a `SyntaxTree`

pub mod flow_graph;
pub mod parsing;
