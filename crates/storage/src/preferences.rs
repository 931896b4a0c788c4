//! Asynchronous preference store
//!
//! Preferences are plain string values addressed by a well-known key.
//! Structured values such as the saved places list are stored as their
//! serialized JSON text; decoding them is the reader's concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::kv::{KvError, KvStore};

/// Well-known preference keys
pub mod keys {
    /// Display name of the signed-in user
    pub const USER_NAME: &str = "userName";
    /// Remote URI of the user's profile image
    pub const PROFILE_IMAGE: &str = "profileImage";
    /// Serialized list of saved places
    pub const SAVED_PLACES: &str = "savedPlaces";
    /// Dark theme flag ("true" / "false")
    pub const DARK_MODE: &str = "darkMode";
}

/// Namespace under which preferences live in the key-value store
pub const PREFERENCE_NAMESPACE: &str = "prefs";

/// Preference store errors
#[derive(Debug, Error)]
pub enum PreferenceStoreError {
    /// Underlying key-value store failure
    #[error("Key-value store error: {0}")]
    Kv(#[from] KvError),

    /// Store is not reachable (e.g. closed or not yet opened)
    #[error("Preference store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for preference store operations
pub type Result<T> = std::result::Result<T, PreferenceStoreError>;

/// Key/value store for user preferences
///
/// Every operation is a one-shot asynchronous call; implementations must not
/// retry internally.
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove the value stored under `key`
    async fn remove_item(&self, key: &str) -> Result<bool>;
}

/// Preference store backed by [`KvStore`]
#[derive(Clone)]
pub struct KvPreferenceStore {
    kv: KvStore,
}

impl KvPreferenceStore {
    /// Create a preference store over an open key-value store
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Create a preference store over a temporary database
    pub fn in_memory() -> Result<Self> {
        Ok(Self::new(KvStore::temporary()?))
    }
}

#[async_trait]
impl PreferenceStore for KvPreferenceStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.kv.load(PREFERENCE_NAMESPACE, key)?)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        tracing::debug!(key, "writing preference");
        self.kv.store(PREFERENCE_NAMESPACE, key, value)?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<bool> {
        Ok(self.kv.delete(PREFERENCE_NAMESPACE, key)?)
    }
}
