//! Shared models

mod span;

pub use crate::errors::{FlowGraphError, Result};
pub use span::{LineIndex, Span};
