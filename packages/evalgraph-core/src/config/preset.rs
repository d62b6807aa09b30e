//! Preset configurations
//!
//! Presets provide complete default configurations for common use cases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Evaluation order only
    ///
    /// - No exception edges into catch parameters
    /// - No `&&`/`||` short-circuit edges
    /// - No result cache (one-shot queries)
    Minimal,

    /// Default for analyses layered on top of the graph
    ///
    /// - Exception and short-circuit edges
    /// - Per-point result cache
    Standard,

    /// Standard, with a resolution depth limit sized for generated code
    Precise,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "standard" => Ok(Self::Standard),
            "precise" => Ok(Self::Precise),
            _ => Err(format!(
                "Unknown preset '{}'. Valid presets: minimal, standard, precise",
                s
            )),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Standard => "standard",
            Self::Precise => "precise",
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
