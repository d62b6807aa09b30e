//! Tree-sitter parser implementation
//!
//! This is where the tree-sitter dependency lives.

use tree_sitter::{Node, Parser as TSParser};

use super::java_lowering::JavaLowering;
use crate::features::parsing::domain::SyntaxTree;
use crate::features::parsing::ports::Parser;
use crate::shared::models::{FlowGraphError, Result, Span};

/// Tree-sitter based parser
pub struct TreeSitterParser {
    language: TreeSitterLanguage,
}

/// Supported tree-sitter languages
#[derive(Debug, Clone, Copy)]
pub enum TreeSitterLanguage {
    Java,
}

impl TreeSitterParser {
    /// Create a Java parser
    pub fn java() -> Self {
        Self {
            language: TreeSitterLanguage::Java,
        }
    }

    fn get_ts_language(&self) -> tree_sitter::Language {
        match self.language {
            TreeSitterLanguage::Java => tree_sitter_java::language(),
        }
    }

    /// Collect ERROR and MISSING nodes as (message, span) pairs, in source order
    fn collect_errors(root: &Node, errors: &mut Vec<(String, Span)>) {
        let mut stack = vec![*root];
        while let Some(node) = stack.pop() {
            if node.is_error() || node.is_missing() {
                let span = Span::new(
                    node.start_position().row as u32 + 1,
                    node.start_position().column as u32,
                    node.end_position().row as u32 + 1,
                    node.end_position().column as u32,
                );
                let message = if node.is_missing() {
                    format!("missing `{}`", node.kind())
                } else {
                    "unexpected syntax".to_string()
                };
                errors.push((message, span));
            }

            // reversed so the first child is visited next
            for i in (0..node.child_count()).rev() {
                if let Some(child) = node.child(i) {
                    stack.push(child);
                }
            }
        }
    }
}

impl Parser for TreeSitterParser {
    fn parse(&self, source: &str, file_path: &str) -> Result<SyntaxTree> {
        let mut parser = TSParser::new();
        parser
            .set_language(&self.get_ts_language())
            .map_err(|e| FlowGraphError::parse_error(format!("Failed to set language: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| FlowGraphError::parse_error("Failed to parse source code"))?;

        let root = tree.root_node();
        let mut errors = Vec::new();
        Self::collect_errors(&root, &mut errors);
        if !errors.is_empty() {
            tracing::warn!(
                file = file_path,
                count = errors.len(),
                "syntax errors; affected constructs lowered as unsupported"
            );
        }

        let mut lowering = JavaLowering::new(source, file_path);
        for (message, span) in errors {
            lowering.add_error(message, span);
        }
        lowering.lower(root)
    }

    fn supports_extension(&self, ext: &str) -> bool {
        match self.language {
            TreeSitterLanguage::Java => ext == "java",
        }
    }

    fn language_name(&self) -> &'static str {
        match self.language {
            TreeSitterLanguage::Java => "java",
        }
    }
}
