//! Observation records and the Philippine region enumeration

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Philippine administrative regions used as spatial bins.
///
/// Closed set: every observation is tagged with exactly one of these 17
/// regions by the data source. The enumeration is ordered and hashable so it
/// can serve as a map key for per-region aggregates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Region {
    #[serde(rename = "NCR")]
    Ncr,
    #[serde(rename = "CAR")]
    Car,
    #[serde(rename = "Region I")]
    RegionI,
    #[serde(rename = "Region II")]
    RegionII,
    #[serde(rename = "Region III")]
    RegionIII,
    #[serde(rename = "Region IV-A")]
    RegionIVA,
    #[serde(rename = "Region IV-B")]
    RegionIVB,
    #[serde(rename = "Region V")]
    RegionV,
    #[serde(rename = "Region VI")]
    RegionVI,
    #[serde(rename = "Region VII")]
    RegionVII,
    #[serde(rename = "Region VIII")]
    RegionVIII,
    #[serde(rename = "Region IX")]
    RegionIX,
    #[serde(rename = "Region X")]
    RegionX,
    #[serde(rename = "Region XI")]
    RegionXI,
    #[serde(rename = "Region XII")]
    RegionXII,
    #[serde(rename = "Region XIII")]
    RegionXIII,
    #[serde(rename = "ARMM")]
    Armm,
}

impl Region {
    /// All 17 regions, in enumeration order.
    pub const ALL: [Region; 17] = [
        Region::Ncr,
        Region::Car,
        Region::RegionI,
        Region::RegionII,
        Region::RegionIII,
        Region::RegionIVA,
        Region::RegionIVB,
        Region::RegionV,
        Region::RegionVI,
        Region::RegionVII,
        Region::RegionVIII,
        Region::RegionIX,
        Region::RegionX,
        Region::RegionXI,
        Region::RegionXII,
        Region::RegionXIII,
        Region::Armm,
    ];

    /// Official display name, matching the wire format.
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Ncr => "NCR",
            Region::Car => "CAR",
            Region::RegionI => "Region I",
            Region::RegionII => "Region II",
            Region::RegionIII => "Region III",
            Region::RegionIVA => "Region IV-A",
            Region::RegionIVB => "Region IV-B",
            Region::RegionV => "Region V",
            Region::RegionVI => "Region VI",
            Region::RegionVII => "Region VII",
            Region::RegionVIII => "Region VIII",
            Region::RegionIX => "Region IX",
            Region::RegionX => "Region X",
            Region::RegionXI => "Region XI",
            Region::RegionXII => "Region XII",
            Region::RegionXIII => "Region XIII",
            Region::Armm => "ARMM",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a region label cannot be resolved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown region: {0}")]
pub struct UnknownRegion(pub String);

impl FromStr for Region {
    type Err = UnknownRegion;

    /// Parse a region label, case-insensitively.
    ///
    /// Accepts the official display name ("Region IV-A") and the compact
    /// underscore form ("region_iv_a") that appears in query strings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', " ");
        Region::ALL
            .iter()
            .find(|r| r.as_str().to_lowercase() == normalized)
            .copied()
            .ok_or_else(|| UnknownRegion(s.to_string()))
    }
}

/// Field-range violation detected during ingestion.
///
/// Raised only at the catalog boundary; observations that reach the feature
/// extractor or risk assessor are already validated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
    #[error("depth {0} must be non-negative")]
    Depth(f64),
    #[error("magnitude {0} outside [0, 10]")]
    Magnitude(f64),
    #[error("observation id must not be empty")]
    EmptyId,
}

/// A single recorded seismic event.
///
/// Immutable once ingested. Ordering of observations is defined by
/// `timestamp`; `id` is assigned by the data source and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Decimal degrees, [-90, 90]
    pub latitude: f64,
    /// Decimal degrees, [-180, 180]
    pub longitude: f64,
    /// Hypocenter depth (km), non-negative
    pub depth: f64,
    /// Moment magnitude, [0, 10]
    pub magnitude: f64,
    pub region: Region,
    /// Free-text locality description from the source bulletin
    #[serde(default)]
    pub location: Option<String>,
    /// Provenance label (bulletin network)
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "PHIVOLCS".to_string()
}

impl Observation {
    /// Check all field-range invariants.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.is_empty() {
            return Err(ValidationError::EmptyId);
        }
        if !(-90.0..=90.0).contains(&self.latitude) || !self.latitude.is_finite() {
            return Err(ValidationError::Latitude(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) || !self.longitude.is_finite() {
            return Err(ValidationError::Longitude(self.longitude));
        }
        if self.depth < 0.0 || !self.depth.is_finite() {
            return Err(ValidationError::Depth(self.depth));
        }
        if !(0.0..=10.0).contains(&self.magnitude) || !self.magnitude.is_finite() {
            return Err(ValidationError::Magnitude(self.magnitude));
        }
        Ok(())
    }

    /// Shallow events (hypocenter above 70 km) drive most surface damage.
    pub fn is_shallow(&self) -> bool {
        self.depth < crate::types::risk_thresholds::SHALLOW_DEPTH_KM
    }

    /// Major events at or above magnitude 6.0.
    pub fn is_high_magnitude(&self) -> bool {
        self.magnitude >= crate::types::risk_thresholds::HIGH_MAGNITUDE_MIN
    }
}
