//! Persisted session state
//!
//! This module reads the signed-in user's identity, saved places and theme
//! flag from the [`PreferenceStore`] and holds them in a reactive
//! [`SessionState`]. Reads never fail from the caller's point of view:
//! missing values degrade to defaults, and damaged values (including saved
//! places written in an unknown format) are logged and treated as empty.

use app_core::{SavedPlace, UserIdentity};
use std::sync::Arc;
use storage::{keys, PreferenceStore, PreferenceStoreError};
use tokio::sync::watch;

/// Session-related errors
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Preference store error
    #[error("Preference store error: {0}")]
    Store(#[from] PreferenceStoreError),

    /// Saved places could not be decoded
    #[error("Corrupt saved places: {0}")]
    CorruptSavedPlaces(#[from] serde_json::Error),

    /// Theme flag is neither "true" nor "false"
    #[error("Invalid dark mode flag: {0}")]
    InvalidDarkMode(String),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Everything the dashboard reads from persisted storage at mount
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PersistedSession {
    /// Signed-in user identity
    pub identity: UserIdentity,
    /// Saved places in persisted order
    pub saved_places: Vec<SavedPlace>,
    /// Dark theme flag
    pub dark_mode: bool,
}

/// Decode the serialized saved places list
pub fn decode_saved_places(raw: &str) -> Result<Vec<SavedPlace>> {
    Ok(serde_json::from_str(raw)?)
}

/// Encode saved places the way [`decode_saved_places`] reads them
pub fn encode_saved_places(places: &[SavedPlace]) -> Result<String> {
    Ok(serde_json::to_string(places)?)
}

fn parse_dark_mode(raw: &str) -> Result<bool> {
    match raw.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(SessionError::InvalidDarkMode(other.to_string())),
    }
}

/// One-shot reader of the persisted session
#[derive(Clone)]
pub struct SessionLoader {
    store: Arc<dyn PreferenceStore>,
}

impl SessionLoader {
    /// Create a loader over a preference store
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    /// Read the user identity, surfacing store errors
    pub async fn try_load_identity(&self) -> Result<UserIdentity> {
        let (name, image) = tokio::join!(
            self.store.get_item(keys::USER_NAME),
            self.store.get_item(keys::PROFILE_IMAGE)
        );
        Ok(UserIdentity::from_parts(name?, image?))
    }

    /// Read the saved places, surfacing store and decoding errors
    pub async fn try_load_saved_places(&self) -> Result<Vec<SavedPlace>> {
        match self.store.get_item(keys::SAVED_PLACES).await? {
            Some(raw) => decode_saved_places(&raw),
            None => Ok(Vec::new()),
        }
    }

    /// Read the dark theme flag, surfacing store and parsing errors
    pub async fn try_load_dark_mode(&self) -> Result<bool> {
        match self.store.get_item(keys::DARK_MODE).await? {
            Some(raw) => parse_dark_mode(&raw),
            None => Ok(false),
        }
    }

    /// Read the user identity
    ///
    /// Name and image degrade independently: a damaged image entry still
    /// leaves a readable name in place, and vice versa.
    pub async fn load_identity(&self) -> UserIdentity {
        let (name, image) =
            tokio::join!(self.load_text(keys::USER_NAME), self.load_text(keys::PROFILE_IMAGE));
        UserIdentity::from_parts(name, image)
    }

    async fn load_text(&self, key: &str) -> Option<String> {
        self.store.get_item(key).await.unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "failed to read preference, using default");
            None
        })
    }

    /// Read the saved places, falling back to an empty list
    pub async fn load_saved_places(&self) -> Vec<SavedPlace> {
        self.try_load_saved_places().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read saved places, treating as empty");
            Vec::new()
        })
    }

    /// Read the dark theme flag, falling back to light
    pub async fn load_dark_mode(&self) -> bool {
        self.try_load_dark_mode().await.unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to read dark mode flag");
            false
        })
    }

    /// Read the whole session concurrently
    pub async fn load(&self) -> PersistedSession {
        let (identity, saved_places, dark_mode) =
            tokio::join!(self.load_identity(), self.load_saved_places(), self.load_dark_mode());

        tracing::debug!(saved_places = saved_places.len(), "persisted session loaded");
        PersistedSession { identity, saved_places, dark_mode }
    }
}

/// Reactive holder of the persisted session
///
/// The session is only ever replaced wholesale.
#[derive(Debug)]
pub struct SessionState {
    session: watch::Sender<PersistedSession>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(PersistedSession::default())
    }
}

impl SessionState {
    /// Create a session state with an initial value
    pub fn new(initial: PersistedSession) -> Self {
        let (session, _) = watch::channel(initial);
        Self { session }
    }

    /// The current session
    pub fn current(&self) -> PersistedSession {
        self.session.borrow().clone()
    }

    /// Current identity
    pub fn identity(&self) -> UserIdentity {
        self.session.borrow().identity.clone()
    }

    /// Current saved places
    pub fn saved_places(&self) -> Vec<SavedPlace> {
        self.session.borrow().saved_places.clone()
    }

    /// Replace the session
    pub fn replace(&self, session: PersistedSession) {
        self.session.send_replace(session);
    }

    /// Subscribe to session replacements
    pub fn subscribe(&self) -> watch::Receiver<PersistedSession> {
        self.session.subscribe()
    }
}
