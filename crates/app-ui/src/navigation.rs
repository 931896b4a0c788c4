//! Navigation for Campus Compass
//!
//! The dashboard does not own routing. Drawer items hand a [`Route`] to a
//! [`Navigator`]; the host shell decides how to present it. A
//! [`StackNavigator`] is provided for shells that just need a back stack.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

// =============================================================================
// Route Definitions
// =============================================================================

/// Screens reachable from the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "route")]
pub enum Route {
    /// Map dashboard
    Dashboard,
    /// Profile view and edit
    Profile,
    /// About the app
    About,
    /// App settings (theme, sounds)
    Settings,
}

impl Route {
    /// Deep link path for this route
    pub fn path(&self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Profile => "/profile",
            Route::About => "/about",
            Route::Settings => "/settings",
        }
    }
}

// =============================================================================
// Navigator
// =============================================================================

/// Capability to move to another screen
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Navigate to `route`
    fn navigate_to(&self, route: Route);
}

/// Back stack of routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationStack {
    /// Stack entries (bottom to top)
    entries: Vec<Route>,
}

impl NavigationStack {
    /// Create a new navigation stack with a root route
    pub fn new(root: Route) -> Self {
        Self { entries: vec![root] }
    }

    /// Push a route onto the stack
    pub fn push(&mut self, route: Route) {
        self.entries.push(route);
    }

    /// Pop the top route (returns true if popped, false if at root)
    pub fn pop(&mut self) -> bool {
        if self.entries.len() > 1 {
            self.entries.pop();
            true
        } else {
            false
        }
    }

    /// Pop to root
    pub fn pop_to_root(&mut self) {
        self.entries.truncate(1);
    }

    /// Get the current (top) route
    pub fn current(&self) -> Route {
        // The root is never popped.
        self.entries[self.entries.len() - 1]
    }

    /// Check if we can go back
    pub fn can_go_back(&self) -> bool {
        self.entries.len() > 1
    }

    /// Get stack depth
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Get all entries
    pub fn entries(&self) -> &[Route] {
        &self.entries
    }
}

/// Navigator keeping a single back stack rooted at the dashboard
#[derive(Debug)]
pub struct StackNavigator {
    stack: Mutex<NavigationStack>,
}

impl Default for StackNavigator {
    fn default() -> Self {
        Self::new(Route::Dashboard)
    }
}

impl StackNavigator {
    /// Create a navigator with a root route
    pub fn new(root: Route) -> Self {
        Self { stack: Mutex::new(NavigationStack::new(root)) }
    }

    /// Current route
    pub fn current(&self) -> Route {
        self.stack.lock().current()
    }

    /// Go back one screen
    pub fn go_back(&self) -> bool {
        self.stack.lock().pop()
    }

    /// Copy of the back stack
    pub fn stack(&self) -> NavigationStack {
        self.stack.lock().clone()
    }
}

impl Navigator for StackNavigator {
    fn navigate_to(&self, route: Route) {
        let mut stack = self.stack.lock();
        if stack.current() == route {
            return;
        }
        if route == Route::Dashboard {
            stack.pop_to_root();
        } else {
            stack.push(route);
        }
        tracing::debug!(path = route.path(), depth = stack.depth(), "navigated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Dashboard.path(), "/");
        assert_eq!(Route::Settings.path(), "/settings");
    }

    #[test]
    fn test_route_serialization() {
        let json = serde_json::to_string(&Route::Profile).unwrap();
        assert_eq!(json, r#"{"route":"Profile"}"#);
    }

    #[test]
    fn test_stack_navigator() {
        let nav = StackNavigator::default();
        assert_eq!(nav.current(), Route::Dashboard);
        assert!(!nav.go_back());

        nav.navigate_to(Route::Profile);
        nav.navigate_to(Route::Profile);
        assert_eq!(nav.stack().depth(), 2);

        nav.navigate_to(Route::About);
        assert_eq!(nav.stack().entries(), &[Route::Dashboard, Route::Profile, Route::About]);

        assert!(nav.go_back());
        assert_eq!(nav.current(), Route::Profile);

        nav.navigate_to(Route::Dashboard);
        assert_eq!(nav.stack().depth(), 1);
        assert!(!nav.stack().can_go_back());
    }

    #[test]
    fn test_mock_navigator() {
        let mut nav = MockNavigator::new();
        nav.expect_navigate_to()
            .withf(|route| *route == Route::About)
            .times(1)
            .return_const(());

        nav.navigate_to(Route::About);
    }
}
