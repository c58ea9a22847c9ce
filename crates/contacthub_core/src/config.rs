//! Typed configuration for core bootstrap.
//!
//! Core takes plain values from its embedder (CLI flags, FFI arguments);
//! it never reads config files or environment variables itself.

use std::path::PathBuf;

pub const CONTACTS_KEY_V1: &str = "nexus_contacts_v1";
pub const GROUPS_KEY_V1: &str = "nexus_groups_v1";

/// Keys under which the two collection snapshots are stored.
///
/// A snapshot schema change must bump the key version rather than rewrite
/// data under an existing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub contacts_key: String,
    pub groups_key: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            contacts_key: CONTACTS_KEY_V1.to_string(),
            groups_key: GROUPS_KEY_V1.to_string(),
        }
    }
}

/// Rolling file log settings; see [`crate::logging::init_logging`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// One of `trace|debug|info|warn|error`, case-insensitive.
    pub level: String,
    /// Absolute directory for rotated log files.
    pub log_dir: PathBuf,
}

impl LoggingConfig {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: crate::logging::default_log_level().to_string(),
            log_dir: log_dir.into(),
        }
    }
}

/// Everything needed to open a [`crate::ContactStore`] on SQLite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreConfig {
    pub storage: StorageConfig,
    /// `None` keeps all state in memory for the process lifetime.
    pub db_path: Option<PathBuf>,
    pub logging: Option<LoggingConfig>,
}
