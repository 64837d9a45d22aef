//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{LedgerError, LedgerResult};

use super::types::AppConfig;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "PRESS_LEDGER_CONFIG";

/// Configuration file used when [`CONFIG_ENV_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "./config/press-ledger.yaml";

/// Loads and provides access to the service configuration.
///
/// # Example
///
/// ```no_run
/// use press_ledger::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/press-ledger.yaml")?;
/// println!("Listening on {}", loader.config().server.bind_address);
/// # Ok::<(), press_ledger::error::LedgerError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::ConfigNotFound`] if the file cannot be read
    /// - [`LedgerError::ConfigParseError`] if it is not valid configuration
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let config = Self::load_yaml::<AppConfig>(path.as_ref())?;
        Ok(Self { config })
    }

    /// Loads from `PRESS_LEDGER_CONFIG`, or the default path if unset.
    ///
    /// A missing file at the default path is not an error: the built-in
    /// defaults are used instead. A missing file named explicitly by the
    /// environment variable is.
    pub fn from_env() -> LedgerResult<Self> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(path),
            Err(_) => match Self::load(DEFAULT_CONFIG_PATH) {
                Err(LedgerError::ConfigNotFound { .. }) => Ok(Self::default()),
                other => other,
            },
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> LedgerResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| LedgerError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| LedgerError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorageBackend;
    use crate::payroll::AdvanceCutoff;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(DEFAULT_CONFIG_PATH);
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.storage.backend, StorageBackend::JsonFile);
        assert_eq!(config.payroll.advance_cutoff, AdvanceCutoff::Chronological);
        assert_eq!(config.company.name, "My Printing Press");
    }

    #[test]
    fn test_load_full_configuration() {
        let file = write_config(
            r#"
server:
  bind_address: "0.0.0.0:8080"
storage:
  backend: json_file
  path: /var/lib/press-ledger/ledger.json
company:
  name: Riverside Print
  address: 9 Mill Road
payroll:
  advance_cutoff: componentwise
"#,
        );

        let config = ConfigLoader::load(file.path()).unwrap().into_config();

        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.storage.backend, StorageBackend::JsonFile);
        assert_eq!(
            config.storage.path,
            PathBuf::from("/var/lib/press-ledger/ledger.json")
        );
        assert_eq!(config.company.name, "Riverside Print");
        assert_eq!(config.company.logo, None);
        assert_eq!(config.payroll.advance_cutoff, AdvanceCutoff::Componentwise);
    }

    #[test]
    fn test_missing_sections_take_defaults() {
        let file = write_config("server:\n  bind_address: \"127.0.0.1:9000\"\n");

        let config = ConfigLoader::load(file.path()).unwrap().into_config();

        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.payroll.advance_cutoff, AdvanceCutoff::Chronological);
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/press-ledger.yaml");

        match result {
            Err(LedgerError::ConfigNotFound { path }) => {
                assert!(path.contains("press-ledger.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_unknown_backend_is_parse_error() {
        let file = write_config("storage:\n  backend: postgres\n");

        let result = ConfigLoader::load(file.path());
        assert!(matches!(result, Err(LedgerError::ConfigParseError { .. })));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let file = write_config("payroll:\n  advance_cutof: componentwise\n");

        let result = ConfigLoader::load(file.path());
        assert!(matches!(result, Err(LedgerError::ConfigParseError { .. })));
    }
}
