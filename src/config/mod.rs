//! Configuration loading for the press ledger service.
//!
//! This module loads the service configuration from a YAML file: the HTTP
//! bind address, the storage backend, default company details and the
//! payroll advance cutoff rule.
//!
//! # Example
//!
//! ```no_run
//! use press_ledger::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/press-ledger.yaml").unwrap();
//! println!("Storage backend: {:?}", config.config().storage.backend);
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_ENV_VAR, ConfigLoader, DEFAULT_CONFIG_PATH};
pub use types::{AppConfig, PayrollConfig, ServerConfig, StorageBackend, StorageConfig};
