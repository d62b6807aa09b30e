//! Flow graph configuration
//!
//! Two tiers:
//! - Preset: `FlowGraphConfig::preset(Preset::Minimal)`
//! - YAML: `FlowGraphConfig::from_yaml("flow-graph.yaml")?` (versioned schema)
//!
//! # Examples
//!
//! ```rust,ignore
//! use evalgraph_core::config::{FlowGraphConfig, Preset};
//!
//! let config = FlowGraphConfig::preset(Preset::Minimal).with_cache_results(true);
//! config.validate()?;
//! ```

pub mod error;
pub mod flow_graph_config;
pub mod io;
pub mod preset;
pub mod validation;

// Re-exports
pub use error::{ConfigError, ConfigResult};
pub use flow_graph_config::FlowGraphConfig;
pub use io::{ConfigExportV1, FlowGraphOverrides};
pub use preset::Preset;
pub use validation::Validatable;
