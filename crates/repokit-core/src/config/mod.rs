//! Configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod logging;
pub mod pagination;
pub mod resolver;

use serde::{Deserialize, Serialize};

pub use self::logging::LoggingConfig;
pub use self::pagination::PaginationConfig;
pub use self::resolver::ResolverConfig;

use crate::error::AppError;

/// Root configuration.
///
/// Top-level deserialization target for the merged TOML files
/// (default.toml + environment overlay) and `REPOKIT__*` variables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Page window defaults.
    #[serde(default)]
    pub pagination: PaginationConfig,
    /// Dotted-path resolver settings.
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default` with an environment-specific overlay and
    /// environment variables prefixed with `REPOKIT__`. Every file is
    /// optional; missing sections fall back to their defaults.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("REPOKIT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }
}
