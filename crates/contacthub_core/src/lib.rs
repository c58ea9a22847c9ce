//! Core domain logic for Connect Hub contacts.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod interchange;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{CoreConfig, LoggingConfig, StorageConfig};
pub use interchange::{
    export_csv, export_filename, export_to_dir, plan_import, ExportError, ImportError, ImportPlan,
    ImportSummary,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactDraft, ContactValidationError};
pub use model::group::Group;
pub use model::id::{ContactId, GroupId};
pub use model::palette::{
    ColorPicker, PaletteColor, RandomColorPicker, RoundRobinColorPicker, PALETTE,
};
pub use repo::kv::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use repo::snapshot_repo::{LoadedState, SnapshotRepository};
pub use repo::{RepoError, RepoResult};
pub use service::contact_store::{
    now_epoch_ms, ContactStore, GroupDeletion, StoreError, StoreResult,
};
pub use service::{ConfirmPrompt, FixedAnswer};
pub use view::{derive_view, group_color, group_counts, group_name, GroupCounts, SortMode, ViewQuery};

/// Opens a SQLite-backed store as described by `config`, starting file
/// logging first when configured.
///
/// # Errors
/// - [`StoreError::Logging`] when file logging cannot start.
/// - Database open, migration and snapshot load failures.
pub fn open_store(config: &CoreConfig) -> StoreResult<ContactStore<SqliteKeyValueStore>> {
    if let Some(logging) = &config.logging {
        init_logging(logging).map_err(StoreError::Logging)?;
    }
    let kv = match &config.db_path {
        Some(path) => SqliteKeyValueStore::open(path)?,
        None => SqliteKeyValueStore::open_in_memory()?,
    };
    ContactStore::open(kv, config.storage.clone())
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, open_store, CoreConfig};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn default_config_opens_seeded_in_memory_store() {
        let store = open_store(&CoreConfig::default()).unwrap();
        assert_eq!(store.groups().len(), 3);
        assert!(store.contacts().is_empty());
    }
}
