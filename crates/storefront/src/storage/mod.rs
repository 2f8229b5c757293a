//! Persistent key-value storage adapter.
//!
//! The storefront persists exactly two opaque blobs across restarts: the
//! session token and the JSON-encoded user profile. This module provides the
//! thin [`KvStore`] abstraction over that storage medium plus two backends:
//!
//! - [`FileStore`] - one file per key under a configured state directory
//! - [`MemoryStore`] - in-process map, used by tests
//!
//! # Known limitation
//!
//! There is no transactional guarantee across keys. Token and user are two
//! independent writes, so a crash between them can leave one key without the
//! other. Callers tolerate this on read by treating a half-present pair as
//! logged out (see `stores::auth::AuthStore::restore`).

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Well-known storage keys.
pub mod keys {
    /// Opaque session token.
    pub const AUTH_TOKEN: &str = "authToken";
    /// JSON-encoded user profile record.
    pub const AUTH_USER: &str = "authUser";
}

/// Errors that can occur reading or writing persisted state.
///
/// Persistence failures are never fatal: the in-memory state remains
/// authoritative for the current session and the error is logged.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Underlying storage I/O failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for storage.
    #[error("storage encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A persistent string key-value store.
///
/// All operations are synchronous; implementations must be safe to share
/// across handler tasks.
pub trait KvStore: Send + Sync {
    /// Read the value for `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage medium cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;

    /// Remove `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage medium cannot be written.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
}
