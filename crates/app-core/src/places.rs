//! User-facing place records: saved places and the signed-in identity

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Display name used when none has been persisted
pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

/// A user-bookmarked point on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaceRecord", into = "PlaceRecord")]
pub struct SavedPlace {
    /// Name shown in the drawer
    pub name: String,
    /// Where the place is
    pub location: Coordinate,
}

impl SavedPlace {
    /// Create a saved place
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self { name: name.into(), location }
    }
}

/// Flat `{name, latitude, longitude}` record used on the wire and on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRecord {
    /// Place name
    pub name: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

impl From<PlaceRecord> for SavedPlace {
    fn from(record: PlaceRecord) -> Self {
        Self::new(record.name, Coordinate::new(record.latitude, record.longitude))
    }
}

impl From<SavedPlace> for PlaceRecord {
    fn from(place: SavedPlace) -> Self {
        Self {
            name: place.name,
            latitude: place.location.latitude,
            longitude: place.location.longitude,
        }
    }
}

/// Identity of the signed-in user as shown in the drawer header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    /// Display name
    pub display_name: String,
    /// Profile image URI, if the user has uploaded one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image_uri: Option<String>,
}

impl Default for UserIdentity {
    fn default() -> Self {
        Self { display_name: DEFAULT_DISPLAY_NAME.to_string(), profile_image_uri: None }
    }
}

impl UserIdentity {
    /// Build an identity from optional persisted values, degrading to defaults
    pub fn from_parts(display_name: Option<String>, profile_image_uri: Option<String>) -> Self {
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
        let profile_image_uri = profile_image_uri.filter(|uri| !uri.is_empty());
        Self { display_name, profile_image_uri }
    }

    /// Initials for the avatar placeholder when no image is set
    pub fn initials(&self) -> String {
        self.display_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}
