//! Parse file use case

use std::path::Path;

use crate::features::parsing::domain::SyntaxTree;
use crate::features::parsing::ports::Parser;
use crate::shared::models::{FlowGraphError, Result};

/// Parse file use case
pub struct ParseFileUseCase<P: Parser> {
    parser: P,
}

impl<P: Parser> ParseFileUseCase<P> {
    pub fn new(parser: P) -> Self {
        Self { parser }
    }

    /// Parse in-memory source
    pub fn execute(&self, source: &str, file_path: &str) -> Result<SyntaxTree> {
        self.parser.parse(source, file_path)
    }

    /// Read and parse a file from disk
    pub fn execute_path(&self, path: &Path) -> Result<SyntaxTree> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        if !self.parser.supports_extension(ext) {
            return Err(FlowGraphError::parse_error(format!(
                "{} parser does not handle `{}`",
                self.parser.language_name(),
                path.display()
            )));
        }
        let source = std::fs::read_to_string(path)?;
        self.execute(&source, &path.to_string_lossy())
    }
}
