//! Persistence adapter.
//!
//! # Responsibility
//! - Abstract the key/value storage primitive (`kv`).
//! - Serialize whole collections as JSON snapshots (`snapshot_repo`).
//!
//! # Invariants
//! - Transport failures surface as [`RepoError`]; malformed snapshot
//!   content does not (it recovers to an empty collection).

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv;
pub mod snapshot_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A collection could not be serialized for writing.
    Encode(serde_json::Error),
    /// Backend-specific failure from a non-SQLite store.
    Backend(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode snapshot: {err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}
