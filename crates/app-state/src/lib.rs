//! Application state management for Campus Compass
//!
//! This crate provides the explicit state containers behind the map
//! dashboard: the map viewport, the navigation drawer animation, the
//! persisted session, and lifetime tracking for async work owned by a
//! mounted component. Every container has a single-writer update API and
//! exposes reads through `tokio::sync::watch` subscriptions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod drawer;
pub mod lifetime;
pub mod session;
pub mod viewport;

pub use drawer::{DrawerAnimationController, DrawerConfig, DrawerMachine, DrawerSnapshot, DrawerState};
pub use lifetime::{ComponentLifetime, LifetimeGuard};
pub use session::{PersistedSession, SessionError, SessionLoader, SessionState};
pub use viewport::{default_campus_region, MapViewportController, DEFAULT_CAMPUS_CENTER};
