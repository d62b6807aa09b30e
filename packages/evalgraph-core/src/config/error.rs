//! Configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Numeric field outside its accepted bounds
    #[error("{config}.{field} = {value} is outside {min}..={max}. {hint}")]
    Range {
        config: &'static str,
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// YAML file without a `version` key
    #[error("configuration file has no 'version' key; start it with 'version: 1'")]
    MissingVersion,

    #[error("configuration version {found} is not supported (supported: {})", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    #[error("unknown preset '{0}' (expected minimal, standard or precise)")]
    UnknownPreset(String),

    #[error("cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML, or a key the schema does not know
    #[error("invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Range error for `field` of the config named `config`
    pub fn out_of_range(
        config: &'static str,
        field: impl Into<String>,
        value: impl ToString,
        bounds: (impl ToString, impl ToString),
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            config,
            field: field.into(),
            value: value.to_string(),
            min: bounds.0.to_string(),
            max: bounds.1.to_string(),
            hint: hint.into(),
        }
    }
}
