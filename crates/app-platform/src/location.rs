//! One-shot device location
//!
//! A location request prompts for foreground permission and, when granted,
//! reads the current position exactly once. There is no continuous tracking,
//! no retry and no timeout beyond whatever the platform applies itself.
//! Callers treat every failure as "keep showing the default region".

use app_core::Coordinate;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::platform::Platform;

/// Why a location could not be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    /// The user declined the foreground location permission
    #[error("Location permission denied")]
    PermissionDenied,

    /// The platform has no location API or the position read failed
    #[error("Location unavailable")]
    Unavailable,
}

/// Result type for location requests
pub type Result<T> = std::result::Result<T, LocationError>;

/// Outcome of the permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Permission granted
    Granted,
    /// Permission denied
    Denied,
    /// The prompt was dismissed without an answer
    Undetermined,
}

/// Failure reported by the platform position API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Location services are switched off
    #[error("Location services disabled")]
    ServicesDisabled,

    /// The platform gave up waiting for a fix
    #[error("Position request timed out")]
    Timeout,

    /// Any other platform failure
    #[error("Platform error: {0}")]
    Platform(String),
}

/// Boundary to the platform permission and position APIs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LocationBackend: Send + Sync {
    /// Show the foreground location permission prompt
    async fn request_foreground_permission(&self) -> PermissionStatus;

    /// Read the current position once
    async fn current_position(&self) -> std::result::Result<Coordinate, BackendError>;
}

/// Source of the device's current coordinate
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Request permission and, on grant, fetch the current position once
    async fn request_current_location(&self) -> Result<Coordinate>;
}

/// Location provider for the running device
pub struct DeviceLocationProvider<B> {
    platform: Platform,
    backend: B,
}

impl<B: LocationBackend> DeviceLocationProvider<B> {
    /// Create a provider for the current build target
    pub fn new(backend: B) -> Self {
        Self::with_platform(Platform::current(), backend)
    }

    /// Create a provider for an explicit platform
    pub fn with_platform(platform: Platform, backend: B) -> Self {
        Self { platform, backend }
    }

    /// The platform this provider targets
    pub fn platform(&self) -> Platform {
        self.platform
    }
}

#[async_trait]
impl<B: LocationBackend> LocationProvider for DeviceLocationProvider<B> {
    async fn request_current_location(&self) -> Result<Coordinate> {
        if !self.platform.supports_location() {
            tracing::debug!(platform = ?self.platform, "location not supported on platform");
            return Err(LocationError::Unavailable);
        }

        match self.backend.request_foreground_permission().await {
            PermissionStatus::Granted => {}
            status => {
                tracing::info!(?status, "location permission not granted");
                return Err(LocationError::PermissionDenied);
            }
        }

        match self.backend.current_position().await {
            Ok(coordinate) => {
                tracing::debug!(
                    latitude = coordinate.latitude,
                    longitude = coordinate.longitude,
                    "acquired location fix"
                );
                Ok(coordinate)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read current position");
                Err(LocationError::Unavailable)
            }
        }
    }
}

/// Scripted backend for hosts without a location API
///
/// Answers every prompt with a fixed status and every position read with a
/// fixed result, counting the calls it receives.
#[derive(Debug)]
pub struct FixedLocationBackend {
    permission: PermissionStatus,
    position: std::result::Result<Coordinate, BackendError>,
    permission_requests: AtomicUsize,
    position_requests: AtomicUsize,
}

impl FixedLocationBackend {
    /// Backend that grants permission and reports `coordinate`
    pub fn granted(coordinate: Coordinate) -> Self {
        Self::new(PermissionStatus::Granted, Ok(coordinate))
    }

    /// Backend whose permission prompt is always declined
    pub fn denied() -> Self {
        Self::new(PermissionStatus::Denied, Err(BackendError::ServicesDisabled))
    }

    /// Backend with explicit answers
    pub fn new(
        permission: PermissionStatus,
        position: std::result::Result<Coordinate, BackendError>,
    ) -> Self {
        Self {
            permission,
            position,
            permission_requests: AtomicUsize::new(0),
            position_requests: AtomicUsize::new(0),
        }
    }

    /// How many times the permission prompt was shown
    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }

    /// How many position reads were made
    pub fn position_requests(&self) -> usize {
        self.position_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationBackend for FixedLocationBackend {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        self.permission
    }

    async fn current_position(&self) -> std::result::Result<Coordinate, BackendError> {
        self.position_requests.fetch_add(1, Ordering::SeqCst);
        self.position.clone()
    }
}

#[async_trait]
impl<B: LocationBackend + ?Sized> LocationBackend for std::sync::Arc<B> {
    async fn request_foreground_permission(&self) -> PermissionStatus {
        (**self).request_foreground_permission().await
    }

    async fn current_position(&self) -> std::result::Result<Coordinate, BackendError> {
        (**self).current_position().await
    }
}
