//! Map viewport state
//!
//! The viewport is a single [`Region`] cell. Every writer goes through
//! [`MapViewportController`], and the last write wins: there is no
//! sequencing between a manual pan and a late async recenter (location fix,
//! search match, saved place). A recenter that resolves after the user has
//! panned will move the map.

use app_core::{Coordinate, Region, Zoom};
use tokio::sync::watch;

/// Center of the default campus framing
pub const DEFAULT_CAMPUS_CENTER: Coordinate = Coordinate::new(-25.54053, 28.09529);

/// Region shown before any location or search result arrives
pub fn default_campus_region() -> Region {
    Region::centered(DEFAULT_CAMPUS_CENTER, Zoom::street_level())
}

/// Owner of the current map region
///
/// # Example
///
/// ```
/// use app_core::{Coordinate, Zoom};
/// use app_state::viewport::MapViewportController;
///
/// let viewport = MapViewportController::default();
/// let rx = viewport.subscribe();
///
/// viewport.center_on(Coordinate::new(-25.7579, 28.2311), Zoom::street_level());
/// assert_eq!(rx.borrow().center, Coordinate::new(-25.7579, 28.2311));
/// ```
#[derive(Debug)]
pub struct MapViewportController {
    region: watch::Sender<Region>,
}

impl Default for MapViewportController {
    fn default() -> Self {
        Self::new(default_campus_region())
    }
}

impl MapViewportController {
    /// Create a controller showing `initial`
    pub fn new(initial: Region) -> Self {
        let (region, _) = watch::channel(initial);
        Self { region }
    }

    /// The current region
    pub fn region(&self) -> Region {
        *self.region.borrow()
    }

    /// Overwrite the region, e.g. after the user pans or zooms the map
    pub fn set_region(&self, region: Region) {
        tracing::trace!(?region, "viewport set");
        self.region.send_replace(region);
    }

    /// Center on a coordinate with a fixed zoom, discarding the current zoom
    pub fn center_on(&self, center: Coordinate, zoom: Zoom) {
        tracing::debug!(
            latitude = center.latitude,
            longitude = center.longitude,
            "viewport recentered"
        );
        self.region.send_replace(Region::centered(center, zoom));
    }

    /// Subscribe to region changes
    pub fn subscribe(&self) -> watch::Receiver<Region> {
        self.region.subscribe()
    }
}
