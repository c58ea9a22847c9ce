//! Whole-collection JSON snapshots over a [`KeyValueStore`].
//!
//! # Responsibility
//! - Load both collections at startup, seeding default groups on first run.
//! - Overwrite one collection's snapshot per save (no diffing).
//!
//! # Invariants
//! - Default groups are seeded only when the groups key is absent, never
//!   when its content is malformed.
//! - A snapshot that is not a JSON array loads as an empty collection; inside
//!   an array, each record that fails to decode is dropped on its own. Both
//!   cases are logged.

use crate::config::StorageConfig;
use crate::model::contact::Contact;
use crate::model::group::Group;
use crate::repo::kv::KeyValueStore;
use crate::repo::RepoResult;
use log::{info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// State returned by [`SnapshotRepository::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    pub contacts: Vec<Contact>,
    pub groups: Vec<Group>,
    /// `true` when default groups were created and persisted by this load.
    pub seeded_defaults: bool,
}

/// Persistence adapter for the contact and group collections.
pub struct SnapshotRepository<S: KeyValueStore> {
    store: S,
    config: StorageConfig,
}

impl<S: KeyValueStore> SnapshotRepository<S> {
    pub fn new(store: S, config: StorageConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reads both snapshots.
    ///
    /// # Errors
    /// - Storage transport failures, including failing to persist seeded
    ///   defaults.
    pub fn load(&mut self) -> RepoResult<LoadedState> {
        let contacts = match self.store.get(&self.config.contacts_key)? {
            Some(raw) => decode_or_empty("contacts", &raw),
            None => Vec::new(),
        };

        let (groups, seeded_defaults) = match self.store.get(&self.config.groups_key)? {
            Some(raw) => (decode_or_empty("groups", &raw), false),
            None => {
                let defaults = Group::defaults();
                self.save_groups(&defaults)?;
                info!(
                    "event=snapshot_seed module=repo status=ok groups={}",
                    defaults.len()
                );
                (defaults, true)
            }
        };

        Ok(LoadedState {
            contacts,
            groups,
            seeded_defaults,
        })
    }

    pub fn save_contacts(&mut self, contacts: &[Contact]) -> RepoResult<()> {
        let key = self.config.contacts_key.clone();
        self.write(&key, contacts)
    }

    pub fn save_groups(&mut self, groups: &[Group]) -> RepoResult<()> {
        let key = self.config.groups_key.clone();
        self.write(&key, groups)
    }

    fn write<T: Serialize>(&mut self, key: &str, records: &[T]) -> RepoResult<()> {
        let encoded = serde_json::to_string(records)?;
        self.store.set(key, &encoded)
    }
}

fn decode_or_empty<T: DeserializeOwned>(collection: &str, raw: &str) -> Vec<T> {
    let values = match serde_json::from_str::<Vec<Value>>(raw) {
        Ok(values) => values,
        Err(err) => {
            warn!(
                "event=snapshot_load module=repo status=recovered collection={collection} error={err}"
            );
            return Vec::new();
        }
    };

    let total = values.len();
    let records = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(
                    "event=snapshot_record module=repo status=dropped collection={collection} error={err}"
                );
                None
            }
        })
        .collect::<Vec<_>>();
    if records.len() < total {
        warn!(
            "event=snapshot_load module=repo status=partial collection={collection} kept={} dropped={}",
            records.len(),
            total - records.len()
        );
    }
    records
}
