//! YAML schema types
//!
//! Loading and saving live on `FlowGraphConfig`; this module only describes
//! the file layout.

use serde::{Deserialize, Serialize};

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigExportV1 {
    /// Schema version (always 1 for v1); optional only so a missing key can
    /// be reported as `MissingVersion` instead of a generic YAML error
    #[serde(default)]
    pub version: Option<u32>,

    /// Base preset
    pub preset: String,

    /// Field-level overrides applied on top of the preset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<FlowGraphOverrides>,
}

/// Configuration overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FlowGraphOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception_edges: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_circuit_edges: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_results: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_resolution_depth: Option<usize>,
}

impl FlowGraphOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
