//! Platform integration for Campus Compass
//!
//! This crate wraps the device capabilities the dashboard needs from the
//! host platform: detecting which platform we run on and acquiring a
//! one-shot location fix behind the foreground permission prompt.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod location;
pub mod platform;

pub use location::{
    BackendError, DeviceLocationProvider, FixedLocationBackend, LocationBackend, LocationError,
    LocationProvider, PermissionStatus,
};
pub use platform::Platform;
