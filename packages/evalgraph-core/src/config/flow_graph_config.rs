//! Flow graph configuration

use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigExportV1, FlowGraphOverrides};
use super::preset::Preset;
use super::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported YAML schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Depth limit bounds for the predecessor resolver
pub const MIN_RESOLUTION_DEPTH: usize = 16;
pub const MAX_RESOLUTION_DEPTH: usize = 100_000;

/// Knobs for `DataFlowGraph`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowGraphConfig {
    /// Preset this configuration was derived from
    pub preset: Preset,

    /// Conservative edges from every point of a try body into each catch
    /// parameter
    pub exception_edges: bool,

    /// Edges from the left operand of `&&`/`||` straight to the operator
    pub short_circuit_edges: bool,

    /// Memoize predecessor results per program point
    pub cache_results: bool,

    /// Recursion limit of a single predecessor query
    pub max_resolution_depth: usize,
}

impl FlowGraphConfig {
    /// Configuration for a preset
    pub fn preset(preset: Preset) -> Self {
        match preset {
            Preset::Minimal => Self {
                preset,
                exception_edges: false,
                short_circuit_edges: false,
                cache_results: false,
                max_resolution_depth: 4_096,
            },
            Preset::Standard => Self {
                preset,
                exception_edges: true,
                short_circuit_edges: true,
                cache_results: true,
                max_resolution_depth: 4_096,
            },
            Preset::Precise => Self {
                preset,
                exception_edges: true,
                short_circuit_edges: true,
                cache_results: true,
                max_resolution_depth: 65_536,
            },
        }
    }

    pub fn with_exception_edges(mut self, enabled: bool) -> Self {
        self.exception_edges = enabled;
        self
    }

    pub fn with_short_circuit_edges(mut self, enabled: bool) -> Self {
        self.short_circuit_edges = enabled;
        self
    }

    pub fn with_cache_results(mut self, enabled: bool) -> Self {
        self.cache_results = enabled;
        self
    }

    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }

    /// Load and validate a YAML configuration file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate YAML configuration text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let export: ConfigExportV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = export.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = Preset::from_str(&export.preset)
            .map_err(|_| ConfigError::UnknownPreset(export.preset.clone()))?;

        let mut config = Self::preset(preset);
        if let Some(overrides) = export.overrides {
            config.apply(&overrides);
        }

        config.validate()?;
        tracing::debug!(preset = %config.preset, "loaded flow graph configuration");
        Ok(config)
    }

    /// Export as YAML; only fields that differ from the preset are written
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let overrides = self.overrides_against_preset();
        let export = ConfigExportV1 {
            version: Some(1),
            preset: self.preset.as_str().to_string(),
            overrides: (!overrides.is_empty()).then_some(overrides),
        };
        Ok(serde_yaml::to_string(&export)?)
    }

    fn apply(&mut self, overrides: &FlowGraphOverrides) {
        if let Some(v) = overrides.exception_edges {
            self.exception_edges = v;
        }
        if let Some(v) = overrides.short_circuit_edges {
            self.short_circuit_edges = v;
        }
        if let Some(v) = overrides.cache_results {
            self.cache_results = v;
        }
        if let Some(v) = overrides.max_resolution_depth {
            self.max_resolution_depth = v;
        }
    }

    fn overrides_against_preset(&self) -> FlowGraphOverrides {
        let base = Self::preset(self.preset);
        FlowGraphOverrides {
            exception_edges: (self.exception_edges != base.exception_edges)
                .then_some(self.exception_edges),
            short_circuit_edges: (self.short_circuit_edges != base.short_circuit_edges)
                .then_some(self.short_circuit_edges),
            cache_results: (self.cache_results != base.cache_results)
                .then_some(self.cache_results),
            max_resolution_depth: (self.max_resolution_depth != base.max_resolution_depth)
                .then_some(self.max_resolution_depth),
        }
    }
}

impl Default for FlowGraphConfig {
    fn default() -> Self {
        Self::preset(Preset::default())
    }
}

impl Validatable for FlowGraphConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !(MIN_RESOLUTION_DEPTH..=MAX_RESOLUTION_DEPTH).contains(&self.max_resolution_depth) {
            return Err(ConfigError::out_of_range(
                self.config_name(),
                "max_resolution_depth",
                self.max_resolution_depth,
                (MIN_RESOLUTION_DEPTH, MAX_RESOLUTION_DEPTH),
                "each nested construct costs a few levels; 4096 covers hand-written code",
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "FlowGraphConfig"
    }
}
