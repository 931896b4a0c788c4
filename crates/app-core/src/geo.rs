//! Geographic value types shared across the dashboard
//!
//! Coordinates are plain WGS84 degrees. Nothing here clamps or normalises
//! values; range checking is the caller's responsibility.

use serde::{Deserialize, Serialize};

/// Default span used whenever the map is framed on a single point
pub const STREET_LEVEL_DELTA: f64 = 0.005;

/// A point on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// Visible span of the map around its center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zoom {
    /// Visible latitude span in degrees
    pub latitude_delta: f64,
    /// Visible longitude span in degrees
    pub longitude_delta: f64,
}

impl Zoom {
    /// Create a zoom from explicit deltas
    pub const fn new(latitude_delta: f64, longitude_delta: f64) -> Self {
        Self { latitude_delta, longitude_delta }
    }

    /// Equal latitude and longitude span
    pub const fn uniform(delta: f64) -> Self {
        Self::new(delta, delta)
    }

    /// Fixed "street-level" framing used for every automatic recenter
    pub const fn street_level() -> Self {
        Self::uniform(STREET_LEVEL_DELTA)
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self::street_level()
    }
}

/// Map viewport descriptor: center plus visible span
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    /// Center of the visible area
    pub center: Coordinate,
    /// Visible latitude span in degrees (> 0)
    pub latitude_delta: f64,
    /// Visible longitude span in degrees (> 0)
    pub longitude_delta: f64,
}

impl Region {
    /// Create a region
    ///
    /// Deltas must be positive. This is checked in debug builds only; the
    /// map surface owns any further validation.
    pub fn new(center: Coordinate, latitude_delta: f64, longitude_delta: f64) -> Self {
        debug_assert!(
            latitude_delta > 0.0 && longitude_delta > 0.0,
            "region deltas must be positive"
        );
        Self { center, latitude_delta, longitude_delta }
    }

    /// Region centered on `center` with the given zoom
    pub fn centered(center: Coordinate, zoom: Zoom) -> Self {
        Self::new(center, zoom.latitude_delta, zoom.longitude_delta)
    }

    /// The zoom component of this region
    pub fn zoom(&self) -> Zoom {
        Zoom::new(self.latitude_delta, self.longitude_delta)
    }
}
