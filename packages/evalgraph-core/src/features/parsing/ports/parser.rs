//! Parser port (interface)
//!
//! Defines the contract for turning source text into a `SyntaxTree`.

use crate::features::parsing::domain::SyntaxTree;
use crate::shared::models::Result;

/// Parser trait - abstraction over parsing implementation
pub trait Parser: Send + Sync {
    /// Parse source code into a SyntaxTree rooted at a compilation unit
    fn parse(&self, source: &str, file_path: &str) -> Result<SyntaxTree>;

    /// Check if this parser supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool;

    /// Get supported language name
    fn language_name(&self) -> &'static str;
}
