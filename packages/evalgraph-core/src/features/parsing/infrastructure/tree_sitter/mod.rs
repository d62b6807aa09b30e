//! Tree-sitter adapter

mod java_lowering;
mod parser;

pub use parser::TreeSitterParser;
