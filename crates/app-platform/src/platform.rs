//! Host platform detection

use serde::{Deserialize, Serialize};

/// Platform the client is running on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Android phone or tablet
    Android,
    /// iPhone or iPad
    Ios,
    /// Browser build
    Web,
    /// Desktop build (Windows, macOS, Linux)
    Desktop,
}

impl Platform {
    /// Platform of the current build target
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else if cfg!(target_arch = "wasm32") {
            Platform::Web
        } else {
            Platform::Desktop
        }
    }

    /// Whether this platform exposes a device location API
    pub fn supports_location(&self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_support() {
        assert!(Platform::Android.supports_location());
        assert!(Platform::Ios.supports_location());
        assert!(!Platform::Web.supports_location());
        assert!(!Platform::Desktop.supports_location());
    }

    #[test]
    fn test_current_on_test_host() {
        // Tests never run on a phone.
        assert!(!Platform::current().supports_location());
    }
}
