//! Campus map dashboard
//!
//! [`DashboardController`] is the composition root of the map screen. It
//! wires the search box to the facility index and the viewport, the
//! hamburger button and drawer items to the drawer animation, and hydrates
//! the drawer header and saved places from persisted storage at mount.
//!
//! Mounting never blocks: the persisted read and the location request run
//! as tasks owned by the dashboard's lifetime. If the dashboard is unmounted
//! before they resolve, their results are dropped.
//!
//! The viewport follows last-write-wins. A location fix that resolves after
//! the user has already panned still recenters the map.

use app_core::{Facility, FacilityIndex, Region, SavedPlace, UserIdentity, Zoom};
use app_platform::{LocationError, LocationProvider};
use app_state::{
    default_campus_region, ComponentLifetime, DrawerAnimationController, DrawerConfig,
    DrawerSnapshot, DrawerState, MapViewportController, PersistedSession, SessionLoader,
    SessionState,
};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use storage::PreferenceStore;
use tokio::sync::watch;

use crate::navigation::{Navigator, Route};
use crate::tokens;

/// Dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardConfig {
    /// Region shown before any async result arrives
    pub initial_region: Region,
    /// Zoom used for every automatic recenter
    pub focus_zoom: Zoom,
    /// Drawer geometry and timing
    pub drawer: DrawerConfig,
    /// Frame interval used to drive the drawer animation
    pub frame_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            initial_region: default_campus_region(),
            focus_zoom: Zoom::uniform(tokens::map::FOCUS_DELTA),
            drawer: DrawerConfig::new(
                tokens::sizing::DRAWER_WIDTH,
                Duration::from_millis(tokens::duration::DRAWER),
            ),
            frame_interval: Duration::from_millis(tokens::duration::FRAME),
        }
    }
}

impl DashboardConfig {
    /// Set the initial region
    pub fn initial_region(mut self, region: Region) -> Self {
        self.initial_region = region;
        self
    }

    /// Set the recenter zoom
    pub fn focus_zoom(mut self, zoom: Zoom) -> Self {
        self.focus_zoom = zoom;
        self
    }

    /// Set the drawer configuration
    pub fn drawer(mut self, drawer: DrawerConfig) -> Self {
        self.drawer = drawer;
        self
    }
}

/// Dismissible message shown over the map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The user declined location access
    LocationPermissionDenied,
    /// Location is not available on this device
    LocationUnavailable,
}

impl Notice {
    /// Text shown to the user
    pub fn message(&self) -> &'static str {
        match self {
            Notice::LocationPermissionDenied => {
                "Location permission was denied. Showing the main campus instead."
            }
            Notice::LocationUnavailable => {
                "Your location is unavailable. Showing the main campus instead."
            }
        }
    }
}

impl From<LocationError> for Notice {
    fn from(error: LocationError) -> Self {
        match error {
            LocationError::PermissionDenied => Notice::LocationPermissionDenied,
            LocationError::Unavailable => Notice::LocationUnavailable,
        }
    }
}

#[derive(Debug, Default)]
struct SearchState {
    query: String,
    markers: Vec<Facility>,
}

/// Controller behind the campus map screen
pub struct DashboardController {
    config: DashboardConfig,
    facilities: FacilityIndex,
    viewport: Arc<MapViewportController>,
    drawer: Arc<DrawerAnimationController>,
    session: Arc<SessionState>,
    search: RwLock<SearchState>,
    notice: Arc<Mutex<Option<Notice>>>,
    navigator: Arc<dyn Navigator>,
    mounted: AtomicBool,
    lifetime: ComponentLifetime,
}

impl DashboardController {
    /// Create a dashboard over a facility index
    ///
    /// # Panics
    ///
    /// Panics on a misconfigured drawer, see
    /// [`DrawerAnimationController::new`].
    pub fn new(
        config: DashboardConfig,
        facilities: FacilityIndex,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let markers = facilities.search("");
        Self {
            config,
            viewport: Arc::new(MapViewportController::new(config.initial_region)),
            drawer: Arc::new(DrawerAnimationController::new(config.drawer)),
            session: Arc::new(SessionState::default()),
            search: RwLock::new(SearchState { query: String::new(), markers }),
            notice: Arc::new(Mutex::new(None)),
            navigator,
            facilities,
            mounted: AtomicBool::new(false),
            lifetime: ComponentLifetime::new("dashboard"),
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Start the mount effects: persisted session read and location request
    ///
    /// Returns immediately. Calling it again is a no-op.
    pub fn mount(&self, store: Arc<dyn PreferenceStore>, location: Arc<dyn LocationProvider>) {
        if self.mounted.swap(true, Ordering::SeqCst) {
            tracing::warn!("dashboard mounted twice");
            return;
        }
        tracing::info!("dashboard mounted");

        let loader = SessionLoader::new(store);
        let session = Arc::clone(&self.session);
        self.lifetime.spawn(move |guard| async move {
            let loaded = loader.load().await;
            if !guard.run_if_alive(|| session.replace(loaded)) {
                tracing::debug!("discarding persisted session after unmount");
            }
        });

        let viewport = Arc::clone(&self.viewport);
        let notice = Arc::clone(&self.notice);
        let zoom = self.config.focus_zoom;
        self.lifetime.spawn(move |guard| async move {
            let result = location.request_current_location().await;
            let applied = guard.run_if_alive(|| match result {
                Ok(coordinate) => viewport.center_on(coordinate, zoom),
                Err(e) => {
                    tracing::info!(error = %e, "keeping default region");
                    *notice.lock() = Some(Notice::from(e));
                }
            });
            if !applied {
                tracing::debug!("discarding location result after unmount");
            }
        });
    }

    /// Wait until the mount effects have resolved
    pub async fn settle(&self) {
        self.lifetime.join().await;
    }

    /// Tear the dashboard down; pending mount effects are dropped
    pub fn unmount(&self) {
        self.lifetime.teardown();
        tracing::info!("dashboard unmounted");
    }

    /// Whether the dashboard is still mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst) && self.lifetime.is_alive()
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Search text changed
    ///
    /// Recomputes the markers and, for a non-empty query with at least one
    /// match, recenters on the first match. Clearing the search does not move
    /// the map.
    pub fn on_search_changed(&self, text: &str) {
        let markers = self.facilities.search(text);
        let focus = if text.is_empty() { None } else { markers.first().map(|f| f.location) };

        tracing::debug!(query = text, matches = markers.len(), "search changed");
        *self.search.write() = SearchState { query: text.to_string(), markers };

        if let Some(location) = focus {
            self.viewport.center_on(location, self.config.focus_zoom);
        }
    }

    /// A saved place was tapped in the drawer
    pub fn on_saved_place_selected(&self, place: &SavedPlace) {
        tracing::debug!(name = %place.name, "saved place selected");
        self.viewport.center_on(place.location, self.config.focus_zoom);
        self.drawer.close_if_open();
    }

    /// A navigation item was tapped in the drawer
    pub fn on_navigate(&self, route: Route) {
        self.drawer.close_if_open();
        self.navigator.navigate_to(route);
    }

    /// The hamburger button was tapped
    pub fn on_drawer_toggle(&self) -> DrawerState {
        self.drawer.toggle()
    }

    /// The drawer backdrop was tapped
    pub fn on_backdrop_pressed(&self) {
        self.drawer.close_if_open();
    }

    /// The user finished panning or zooming the map
    pub fn on_region_change_complete(&self, region: Region) {
        self.viewport.set_region(region);
    }

    /// The user dismissed the current notice
    pub fn dismiss_notice(&self) {
        self.notice.lock().take();
    }

    /// Drive the drawer animation until it settles
    pub async fn animate_drawer(&self) -> DrawerSnapshot {
        self.drawer.run_frames(self.config.frame_interval).await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Current map region
    pub fn region(&self) -> Region {
        self.viewport.region()
    }

    /// Facilities to render as markers for the current query
    pub fn markers(&self) -> Vec<Facility> {
        self.search.read().markers.clone()
    }

    /// Current search text
    pub fn query(&self) -> String {
        self.search.read().query.clone()
    }

    /// Identity shown in the drawer header
    pub fn identity(&self) -> UserIdentity {
        self.session.identity()
    }

    /// Saved places listed in the drawer
    pub fn saved_places(&self) -> Vec<SavedPlace> {
        self.session.saved_places()
    }

    /// Current drawer snapshot
    pub fn drawer(&self) -> DrawerSnapshot {
        self.drawer.tick()
    }

    /// Notice waiting to be shown, if any
    pub fn notice(&self) -> Option<Notice> {
        *self.notice.lock()
    }

    /// Subscribe to region changes
    pub fn subscribe_region(&self) -> watch::Receiver<Region> {
        self.viewport.subscribe()
    }

    /// Subscribe to drawer snapshots
    pub fn subscribe_drawer(&self) -> watch::Receiver<DrawerSnapshot> {
        self.drawer.subscribe()
    }

    /// Subscribe to persisted session replacements
    pub fn subscribe_session(&self) -> watch::Receiver<PersistedSession> {
        self.session.subscribe()
    }
}

impl Drop for DashboardController {
    fn drop(&mut self) {
        self.lifetime.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::{MockNavigator, StackNavigator};
    use app_core::Coordinate;
    use async_trait::async_trait;
    use storage::{keys, KvPreferenceStore};

    const LIBRARY: Coordinate = Coordinate::new(-25.7579, 28.2311);
    const CAFETERIA: Coordinate = Coordinate::new(-25.7585, 28.2315);

    struct StubLocation {
        result: Result<Coordinate, LocationError>,
        delay: Duration,
    }

    impl StubLocation {
        fn granted(at: Coordinate) -> Arc<Self> {
            Arc::new(Self { result: Ok(at), delay: Duration::ZERO })
        }

        fn failing(error: LocationError) -> Arc<Self> {
            Arc::new(Self { result: Err(error), delay: Duration::ZERO })
        }

        fn delayed(at: Coordinate, delay: Duration) -> Arc<Self> {
            Arc::new(Self { result: Ok(at), delay })
        }
    }

    #[async_trait]
    impl LocationProvider for StubLocation {
        async fn request_current_location(&self) -> Result<Coordinate, LocationError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.result
        }
    }

    struct SlowStore {
        inner: Arc<KvPreferenceStore>,
        delay: Duration,
    }

    #[async_trait]
    impl PreferenceStore for SlowStore {
        async fn get_item(&self, key: &str) -> storage::preferences::Result<Option<String>> {
            tokio::time::sleep(self.delay).await;
            self.inner.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> storage::preferences::Result<()> {
            self.inner.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> storage::preferences::Result<bool> {
            self.inner.remove_item(key).await
        }
    }

    fn facilities() -> FacilityIndex {
        FacilityIndex::new(vec![
            Facility::new("Library", LIBRARY),
            Facility::new("Cafeteria", CAFETERIA),
        ])
        .unwrap()
    }

    fn dashboard() -> DashboardController {
        DashboardController::new(
            DashboardConfig::default(),
            facilities(),
            Arc::new(StackNavigator::default()),
        )
    }

    fn empty_store() -> Arc<KvPreferenceStore> {
        Arc::new(KvPreferenceStore::in_memory().unwrap())
    }

    fn street_level_at(center: Coordinate) -> Region {
        Region::centered(center, Zoom::uniform(0.005))
    }

    #[tokio::test]
    async fn test_initial_state() {
        let dash = dashboard();

        assert_eq!(dash.region(), default_campus_region());
        assert_eq!(dash.markers().len(), 2);
        assert_eq!(dash.query(), "");
        assert_eq!(dash.identity(), UserIdentity::default());
        assert!(dash.saved_places().is_empty());
        assert_eq!(dash.drawer().state, DrawerState::Closed);
        assert_eq!(dash.notice(), None);
    }

    #[tokio::test]
    async fn test_search_filters_and_recenters() {
        let dash = dashboard();

        dash.on_search_changed("lib");

        let markers = dash.markers();
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].name, "Library");
        assert_eq!(dash.region(), street_level_at(LIBRARY));
    }

    #[tokio::test]
    async fn test_search_without_match_keeps_region() {
        let dash = dashboard();
        dash.on_search_changed("caf");
        assert_eq!(dash.region(), street_level_at(CAFETERIA));

        dash.on_search_changed("planetarium");
        assert!(dash.markers().is_empty());
        assert_eq!(dash.region(), street_level_at(CAFETERIA));
    }

    #[tokio::test]
    async fn test_clearing_search_does_not_recenter() {
        let dash = dashboard();
        dash.on_search_changed("caf");

        let panned = Region::new(Coordinate::new(-25.0, 28.0), 0.1, 0.1);
        dash.on_region_change_complete(panned);

        dash.on_search_changed("");
        assert_eq!(dash.markers().len(), 2);
        assert_eq!(dash.region(), panned);
    }

    #[tokio::test]
    async fn test_mount_with_granted_location() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::granted(CAFETERIA));
        dash.settle().await;

        assert_eq!(dash.region(), street_level_at(CAFETERIA));
        assert_eq!(dash.notice(), None);
        assert!(dash.is_mounted());
    }

    #[tokio::test]
    async fn test_mount_with_denied_location() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::failing(LocationError::PermissionDenied));
        dash.settle().await;

        assert_eq!(
            dash.region(),
            Region::new(Coordinate::new(-25.54053, 28.09529), 0.005, 0.005)
        );
        assert_eq!(dash.notice(), Some(Notice::LocationPermissionDenied));

        dash.dismiss_notice();
        assert_eq!(dash.notice(), None);
    }

    #[tokio::test]
    async fn test_mount_unavailable_location() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::failing(LocationError::Unavailable));
        dash.settle().await;

        assert_eq!(dash.region(), default_campus_region());
        assert_eq!(dash.notice(), Some(Notice::LocationUnavailable));
        assert!(dash.notice().unwrap().message().contains("unavailable"));
    }

    #[tokio::test]
    async fn test_mount_hydrates_session() {
        let store = empty_store();
        store.set_item(keys::USER_NAME, "Thandi").await.unwrap();
        store
            .set_item(
                keys::SAVED_PLACES,
                r#"[{"name":"Library","latitude":-25.7579,"longitude":28.2311}]"#,
            )
            .await
            .unwrap();

        let dash = dashboard();
        dash.mount(store, StubLocation::failing(LocationError::Unavailable));
        dash.settle().await;

        assert_eq!(dash.identity().display_name, "Thandi");
        assert_eq!(dash.saved_places(), vec![SavedPlace::new("Library", LIBRARY)]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_location_fix_overrides_manual_pan() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::delayed(LIBRARY, Duration::from_secs(2)));

        let panned = Region::new(Coordinate::new(-25.6, 28.1), 0.02, 0.02);
        dash.on_region_change_complete(panned);
        assert_eq!(dash.region(), panned);

        dash.settle().await;
        assert_eq!(dash.region(), street_level_at(LIBRARY));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_pending_location() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::delayed(LIBRARY, Duration::from_secs(2)));

        dash.unmount();
        assert!(!dash.is_mounted());

        tokio::time::sleep(Duration::from_secs(5)).await;
        dash.settle().await;
        assert_eq!(dash.region(), default_campus_region());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_discards_pending_session() {
        let inner = empty_store();
        inner.set_item(keys::USER_NAME, "Thandi").await.unwrap();
        inner
            .set_item(
                keys::SAVED_PLACES,
                r#"[{"name":"Library","latitude":-25.7579,"longitude":28.2311}]"#,
            )
            .await
            .unwrap();
        let store = Arc::new(SlowStore { inner, delay: Duration::from_secs(2) });

        let dash = dashboard();
        let session_rx = dash.subscribe_session();
        dash.mount(store, StubLocation::failing(LocationError::Unavailable));

        dash.unmount();
        tokio::time::sleep(Duration::from_secs(5)).await;
        dash.settle().await;

        assert_eq!(dash.identity(), UserIdentity::default());
        assert!(dash.saved_places().is_empty());
        assert!(!session_rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_place_recenters_and_closes_drawer() {
        let dash = dashboard();
        dash.on_drawer_toggle();
        assert_eq!(dash.animate_drawer().await.state, DrawerState::Open);

        dash.on_saved_place_selected(&SavedPlace::new("Library", LIBRARY));

        assert_eq!(dash.region(), street_level_at(LIBRARY));
        let snapshot = dash.drawer();
        assert_eq!(snapshot.state, DrawerState::Closing);
        assert!(snapshot.visible());

        assert_eq!(dash.animate_drawer().await.state, DrawerState::Closed);
        assert!(!dash.drawer().visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_place_with_closed_drawer_leaves_it_closed() {
        let dash = dashboard();
        dash.on_saved_place_selected(&SavedPlace::new("Cafeteria", CAFETERIA));

        assert_eq!(dash.region(), street_level_at(CAFETERIA));
        assert_eq!(dash.drawer().state, DrawerState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_navigate_closes_drawer_and_routes() {
        let mut navigator = MockNavigator::new();
        navigator
            .expect_navigate_to()
            .withf(|route| *route == Route::Profile)
            .times(1)
            .return_const(());

        let dash = DashboardController::new(
            DashboardConfig::default(),
            facilities(),
            Arc::new(navigator),
        );
        dash.on_drawer_toggle();
        tokio::time::advance(Duration::from_millis(100)).await;

        dash.on_navigate(Route::Profile);
        assert_eq!(dash.drawer().state, DrawerState::Closing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backdrop_closes_drawer() {
        let dash = dashboard();
        dash.on_drawer_toggle();
        dash.animate_drawer().await;

        dash.on_backdrop_pressed();
        assert_eq!(dash.drawer().state, DrawerState::Closing);
    }

    #[tokio::test]
    async fn test_subscriptions() {
        let dash = dashboard();
        let mut region_rx = dash.subscribe_region();
        let mut drawer_rx = dash.subscribe_drawer();
        let session_rx = dash.subscribe_session();

        dash.on_search_changed("caf");
        region_rx.changed().await.unwrap();
        assert_eq!(region_rx.borrow().center, CAFETERIA);

        dash.on_drawer_toggle();
        drawer_rx.changed().await.unwrap();
        assert_eq!(drawer_rx.borrow().state, DrawerState::Opening);

        assert_eq!(*session_rx.borrow(), PersistedSession::default());
    }

    #[tokio::test]
    async fn test_second_mount_is_ignored() {
        let dash = dashboard();
        dash.mount(empty_store(), StubLocation::granted(LIBRARY));
        dash.mount(empty_store(), StubLocation::granted(CAFETERIA));
        dash.settle().await;

        assert_eq!(dash.region(), street_level_at(LIBRARY));
    }
}
