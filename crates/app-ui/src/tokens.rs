//! Design tokens for the map dashboard
//!
//! The dashboard builds its default [`DashboardConfig`](crate::DashboardConfig)
//! from these values and hands them to its state controllers.

/// Sizing tokens in layout points
pub mod sizing {
    /// Width of the slide-in navigation drawer
    pub const DRAWER_WIDTH: f64 = 280.0;
}

/// Animation durations in milliseconds
pub mod duration {
    /// Drawer slide in either direction
    pub const DRAWER: u64 = 300;
    /// Frame interval for driving animations (~60fps)
    pub const FRAME: u64 = 16;
}

/// Map framing
pub mod map {
    /// Span used for every automatic recenter
    pub const FOCUS_DELTA: f64 = app_core::STREET_LEVEL_DELTA;
}
