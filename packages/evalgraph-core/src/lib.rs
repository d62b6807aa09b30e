/*
 * evalgraph-core - Evaluation-Order Data Flow Graph
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span, errors)
 * - features/    : Vertical slices (parsing → flow_graph)
 * - config/      : Presets + versioned YAML
 *
 * Queries are lazy and memoized; one graph can be shared across threads.
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed
#![allow(clippy::should_implement_trait)] // from_str naming intentional

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Shared models and utilities
pub mod shared;

/// Feature modules (parsing, flow graph)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{FlowGraphConfig, Preset, Validatable};
pub use errors::{FlowGraphError, Result};
pub use features::flow_graph::{
    BuildFlowGraphUseCase, CacheStats, DataFlowGraph, DataFlowGraphAnalyzer, EdgeKind,
    FlowAnalyzer, FlowEdge, FlowGraphResult, FlowGraphSnapshot, Phase, ProgramPoint,
};
pub use features::parsing::{
    Cursor, NodeId, NodeKind, ParseFileUseCase, Parser, SyntaxTree, SyntaxTreeBuilder,
    TreeSitterParser,
};
