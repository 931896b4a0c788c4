//! User interface layer for Campus Compass
//!
//! This crate provides the map dashboard screen controller, the navigation
//! capability its drawer items use, and the design tokens shared between the
//! screen and its state controllers.
//!
//! # Modules
//!
//! - [`dashboard`] - Map dashboard composition root
//! - [`navigation`] - Routes and the navigator capability
//! - [`tokens`] - Drawer, timing and map framing tokens
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use app_core::FacilityIndex;
//! use app_ui::dashboard::{DashboardConfig, DashboardController};
//! use app_ui::navigation::StackNavigator;
//!
//! let dashboard = DashboardController::new(
//!     DashboardConfig::default(),
//!     FacilityIndex::campus_default(),
//!     Arc::new(StackNavigator::default()),
//! );
//!
//! dashboard.on_search_changed("library");
//! assert_eq!(dashboard.markers()[0].name, "Library");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod dashboard;
pub mod navigation;
pub mod tokens;

pub use dashboard::{DashboardConfig, DashboardController, Notice};
pub use navigation::{NavigationStack, Navigator, Route, StackNavigator};
