//! Local durable key-value storage.
//!
//! The Mini App keeps JSON snapshots of its stores (cart, delivery
//! preference, address lists) so a fresh session renders instantly before
//! any network round trip. Each key is one JSON file in the configured data
//! directory; writes go through a temp file and rename so a crash never
//! leaves a half-written snapshot.
//!
//! Storage is shared last-writer-wins state. Callers (the stores) treat a
//! failed write as a degraded continuation: log it and keep serving the
//! in-memory copy.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

/// Well-known storage keys.
pub mod keys {
    /// The full cart snapshot: items, restaurant id, subtotal.
    pub const CART: &str = "cart";
    /// The fulfillment mode literal: `delivery` or `pickup`.
    pub const DELIVERY_TYPE: &str = "deliveryType";
    /// The currently selected delivery address.
    pub const SELECTED_ADDRESS: &str = "selectedAddress";
    /// The currently selected pickup branch.
    pub const SELECTED_BRANCH: &str = "selectedBranch";
    /// The user's saved address list.
    pub const USER_ADDRESSES: &str = "userAddresses";
    /// Known pickup branches.
    pub const USER_BRANCHES: &str = "userBranches";
    /// Monotonic preference version for remote reconciliation.
    pub const PREFERENCE_VERSION: &str = "preferenceVersion";
}

/// Errors from the local store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored snapshot is not valid JSON for the requested type.
    #[error("corrupt snapshot for key '{key}': {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A directory-backed key-value store with JSON values.
#[derive(Debug, Clone)]
pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Read and deserialize the value stored under `key`.
    ///
    /// A missing key is `Ok(None)`; a present-but-unreadable snapshot is an
    /// error so callers can decide between degrading and surfacing it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failure and
    /// `StorageError::Corrupt` when the snapshot does not parse.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let path = self.path_for(key);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StorageError::Io {
                    key: key.to_owned(),
                    source,
                });
            }
        };

        let value = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })?;
        debug!(key, "hydrated snapshot from local store");
        Ok(Some(value))
    }

    /// Serialize `value` and persist it under `key`, replacing any previous
    /// snapshot. The write is temp-file + rename.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failure.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })?;

        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        write_then_rename(&tmp, &path, &raw).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }

    /// Delete the snapshot under `key`. Missing keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` on filesystem failure other than absence.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }
}

fn write_then_rename(tmp: &Path, path: &Path, raw: &str) -> std::io::Result<()> {
    fs::write(tmp, raw)?;
    fs::rename(tmp, path)
}
