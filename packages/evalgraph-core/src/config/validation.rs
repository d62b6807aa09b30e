//! Validation hook shared by configuration types

use super::error::ConfigResult;

pub trait Validatable {
    /// Check every bounded field; the first violation is returned
    fn validate(&self) -> ConfigResult<()>;

    /// Prefix used in error messages (`FlowGraphConfig.max_resolution_depth`)
    fn config_name(&self) -> &'static str;
}
