//! Storage layer for Campus Compass
//!
//! This crate provides the sled-backed key-value store and the
//! asynchronous preference store the dashboard reads its persisted
//! session from.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;
pub mod preferences;

pub use kv::{KvConfig, KvError, KvStore};
pub use preferences::{
    keys, KvPreferenceStore, PreferenceStore, PreferenceStoreError, PREFERENCE_NAMESPACE,
};
