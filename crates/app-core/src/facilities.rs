//! Campus facility index and its data sources
//!
//! The index is an ordered list of uniquely named facilities. Search is a
//! case-insensitive substring match on the name that keeps index order;
//! the same results drive both the map markers and viewport recentering.
//!
//! Facilities can come from the built-in campus list or from the remote
//! API. Both go through [`FacilitySource`] so the search contract does not
//! depend on where the data came from.

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::geo::Coordinate;
use crate::places::PlaceRecord;

/// Errors that can occur while building or loading a facility index
#[derive(Debug, thiserror::Error)]
pub enum FacilityError {
    /// Two facilities share a name
    #[error("Duplicate facility name: {0}")]
    DuplicateName(String),

    /// HTTP transport error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
}

/// Result type for facility operations
pub type Result<T> = std::result::Result<T, FacilityError>;

/// A named point of interest on campus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlaceRecord", into = "PlaceRecord")]
pub struct Facility {
    /// Unique name within an index
    pub name: String,
    /// Where the facility is
    pub location: Coordinate,
}

impl Facility {
    /// Create a facility
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self { name: name.into(), location }
    }

    /// Case-insensitive substring match against the facility name
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

impl From<PlaceRecord> for Facility {
    fn from(record: PlaceRecord) -> Self {
        Self::new(record.name, Coordinate::new(record.latitude, record.longitude))
    }
}

impl From<Facility> for PlaceRecord {
    fn from(facility: Facility) -> Self {
        Self {
            name: facility.name,
            latitude: facility.location.latitude,
            longitude: facility.location.longitude,
        }
    }
}

/// Ordered, read-only list of facilities with substring search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacilityIndex {
    facilities: Vec<Facility>,
}

impl FacilityIndex {
    /// Build an index, rejecting duplicate names
    pub fn new(facilities: Vec<Facility>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(facilities.len());
        for facility in &facilities {
            if !seen.insert(facility.name.as_str()) {
                return Err(FacilityError::DuplicateName(facility.name.clone()));
            }
        }
        Ok(Self { facilities })
    }

    /// The built-in campus facility list
    pub fn campus_default() -> Self {
        Self { facilities: campus_facilities() }
    }

    /// Build an index from any facility source
    pub async fn load(source: &dyn FacilitySource) -> Result<Self> {
        let facilities = source.load().await?;
        tracing::debug!(count = facilities.len(), "loaded facilities");
        Self::new(facilities)
    }

    /// All facilities in index order
    pub fn all(&self) -> &[Facility] {
        &self.facilities
    }

    /// Number of facilities in the index
    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    /// Facilities whose name contains `query`, ignoring case, in index order
    ///
    /// An empty query returns every facility.
    pub fn search(&self, query: &str) -> Vec<Facility> {
        let needle = query.to_lowercase();
        self.facilities
            .iter()
            .filter(|f| f.matches(&needle))
            .cloned()
            .collect()
    }

    /// The first facility matching `query`, if any
    pub fn first_match(&self, query: &str) -> Option<&Facility> {
        let needle = query.to_lowercase();
        self.facilities.iter().find(|f| f.matches(&needle))
    }

    /// Look up a facility by exact name
    pub fn get(&self, name: &str) -> Option<&Facility> {
        self.facilities.iter().find(|f| f.name == name)
    }
}

fn campus_facilities() -> Vec<Facility> {
    [
        ("Library", -25.54011, 28.09575),
        ("Student Centre", -25.54102, 28.09468),
        ("Cafeteria", -25.54127, 28.09512),
        ("Great Hall", -25.53968, 28.09633),
        ("Administration Building", -25.54055, 28.09402),
        ("Engineering Building", -25.53894, 28.09497),
        ("Clinic", -25.54219, 28.09588),
        ("Sports Complex", -25.54301, 28.09356),
    ]
    .into_iter()
    .map(|(name, lat, lon)| Facility::new(name, Coordinate::new(lat, lon)))
    .collect()
}

/// Where facilities come from
#[async_trait]
pub trait FacilitySource: Send + Sync {
    /// Load the ordered facility list
    async fn load(&self) -> Result<Vec<Facility>>;
}

/// Facility source serving a fixed list
#[derive(Debug, Clone)]
pub struct StaticFacilitySource {
    facilities: Vec<Facility>,
}

impl StaticFacilitySource {
    /// Serve the given list
    pub fn new(facilities: Vec<Facility>) -> Self {
        Self { facilities }
    }

    /// Serve the built-in campus list
    pub fn campus() -> Self {
        Self::new(campus_facilities())
    }
}

#[async_trait]
impl FacilitySource for StaticFacilitySource {
    async fn load(&self) -> Result<Vec<Facility>> {
        Ok(self.facilities.clone())
    }
}

/// Remote facility source configuration
#[derive(Debug, Clone)]
pub struct RemoteFacilityConfig {
    /// Base API URL (e.g., "https://api.example.edu")
    pub base_url: String,
    /// Path of the facility listing endpoint
    pub path: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for RemoteFacilityConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            path: "/facilities".to_string(),
            timeout: Duration::from_secs(15),
            user_agent: format!("Campus-Compass/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl RemoteFacilityConfig {
    /// Create a config for an API base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Default::default() }
    }

    /// Set the listing endpoint path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }
}

/// Facility source loading `[{name, latitude, longitude}]` over HTTP
pub struct RemoteFacilitySource {
    client: ReqwestClient,
    config: RemoteFacilityConfig,
}

impl RemoteFacilitySource {
    /// Create a remote source
    pub fn new(config: RemoteFacilityConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl FacilitySource for RemoteFacilitySource {
    async fn load(&self) -> Result<Vec<Facility>> {
        let url = self.config.url();
        tracing::debug!(%url, "fetching facilities");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "facility listing failed");
            return Err(FacilityError::Api { status: status.as_u16(), message });
        }

        Ok(response.json::<Vec<Facility>>().await?)
    }
}
