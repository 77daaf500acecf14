//! Configuration for calling sessions.
//!
//! TOML-based, with every section defaulted so a partial (or missing)
//! file still yields a usable config.
//!
//! ```rust,no_run
//! let config = calling_config::load_config().expect("failed to load config");
//! println!("{}", config.session.model);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    CallingConfig, LogLevel, LoggingConfig, SessionConfig, CONFIG_SCHEMA_VERSION,
    DEFAULT_MODEL, DEFAULT_SYSTEM_PROMPT, RESERVED_REQUEST_KEYS,
};

use calling_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if absent,
/// and validate the result.
pub fn load_config() -> Result<CallingConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load and validate config from an explicit path.
pub fn load_config_from(path: &Path) -> Result<CallingConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_from_missing_path_is_file_not_found() {
        let err = load_config_from(Path::new("/tmp/calling_missing_config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn load_config_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[session]\nmodel = \"\"\n").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn config_schema_version_is_1() {
        assert_eq!(CONFIG_SCHEMA_VERSION, 1);
    }
}
