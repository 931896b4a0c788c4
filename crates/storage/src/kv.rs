//! sled-backed storage for preference values
//!
//! Entries are addressed by a namespace and a name and stored under
//! `<namespace>:<name>` as JSON. A value that no longer decodes is reported
//! as [`KvError::Serialization`] instead of being treated as missing, so
//! readers can tell "never written" apart from "damaged".

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;
use thiserror::Error;

const SEPARATOR: char = ':';

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Stored value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Namespace or name is empty or contains the separator
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Where and how the preference database is opened
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database directory
    pub path: PathBuf,
    /// Background flush interval; `None` flushes on every write
    pub flush_every_ms: Option<u64>,
}

impl KvConfig {
    /// Configuration for a database at `path` with a 500ms background flush
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), flush_every_ms: Some(500) }
    }

    /// Set the flush interval
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Handle to the preference database
///
/// Clones share the same underlying database.
#[derive(Clone)]
pub struct KvStore {
    db: sled::Db,
    flush_on_write: bool,
}

impl KvStore {
    /// Open (or create) the database described by `config`
    pub fn open(config: &KvConfig) -> Result<Self> {
        let db = sled::Config::new()
            .path(&config.path)
            .use_compression(true)
            .flush_every_ms(config.flush_every_ms)
            .open()?;
        tracing::debug!(path = %config.path.display(), "opened preference database");

        Ok(Self { db, flush_on_write: config.flush_every_ms.is_none() })
    }

    /// Open a throwaway database that is removed on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db, flush_on_write: false })
    }

    /// Read and decode the entry `namespace:name`
    pub fn load<T>(&self, namespace: &str, name: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        let key = entry_key(namespace, name)?;
        self.db
            .get(key.as_bytes())?
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()
            .map_err(KvError::from)
    }

    /// Encode and write the entry `namespace:name`
    pub fn store<T>(&self, namespace: &str, name: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = entry_key(namespace, name)?;
        self.db.insert(key.as_bytes(), serde_json::to_vec(value)?)?;
        self.flush_if_sync()
    }

    /// Delete the entry `namespace:name`, returning whether it existed
    pub fn delete(&self, namespace: &str, name: &str) -> Result<bool> {
        let key = entry_key(namespace, name)?;
        let existed = self.db.remove(key.as_bytes())?.is_some();
        self.flush_if_sync()?;
        Ok(existed)
    }

    fn flush_if_sync(&self) -> Result<()> {
        if self.flush_on_write {
            self.db.flush()?;
        }
        Ok(())
    }
}

fn entry_key(namespace: &str, name: &str) -> Result<String> {
    let valid = |part: &str| !part.is_empty() && !part.contains(SEPARATOR);
    if !valid(namespace) || !valid(name) {
        return Err(KvError::InvalidKey(format!("{namespace}{SEPARATOR}{name}")));
    }
    Ok(format!("{namespace}{SEPARATOR}{name}"))
}
