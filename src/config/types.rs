//! Configuration types for the press ledger service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file. Every section and
//! field is optional; omitted values take the defaults below.

use std::path::PathBuf;

use serde::Deserialize;

use crate::models::CompanyInfo;
use crate::payroll::AdvanceCutoff;

/// Top-level configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Where the ledger snapshot lives.
    pub storage: StorageConfig,
    /// Company details used for a fresh or reset ledger.
    pub company: CompanyInfo,
    /// Payroll calculation settings.
    pub payroll: PayrollConfig,
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Which persistence backend holds the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Nothing survives a restart.
    #[default]
    Memory,
    /// A single JSON file rewritten after every change.
    JsonFile,
}

/// Storage settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// The backend to use.
    pub backend: StorageBackend,
    /// Snapshot file path for the `json_file` backend.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            path: PathBuf::from("./data/press-ledger.json"),
        }
    }
}

/// Payroll calculation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PayrollConfig {
    /// How advance dates are compared with the pay month.
    pub advance_cutoff: AdvanceCutoff,
}
