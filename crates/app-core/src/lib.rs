//! Core domain model for Campus Compass
//!
//! This crate contains the value types shared by every layer of the
//! dashboard (coordinates, regions, saved places, the user identity) and
//! the facility index used for search and map markers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod facilities;
pub mod geo;
pub mod places;

pub use facilities::{
    Facility, FacilityError, FacilityIndex, FacilitySource, RemoteFacilityConfig,
    RemoteFacilitySource, StaticFacilitySource,
};
pub use geo::{Coordinate, Region, Zoom, STREET_LEVEL_DELTA};
pub use places::{PlaceRecord, SavedPlace, UserIdentity, DEFAULT_DISPLAY_NAME};
