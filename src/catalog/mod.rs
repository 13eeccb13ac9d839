//! In-memory observation catalog
//!
//! The catalog is the only stateful component in the service. It owns the
//! observation set behind a `RwLock` and hands out owned snapshots, so every
//! analytic call operates on a consistent copy with no shared mutable
//! state. All ingestion paths validate field-range invariants; nothing
//! invalid reaches the feature extractor or risk assessor.

mod csv_loader;
pub mod sample;

pub use csv_loader::load_csv;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;
use thiserror::Error;

use crate::types::{Observation, Region, ValidationError};

/// Catalog ingestion and query errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed catalog record: {0}")]
    Csv(#[from] csv::Error),

    #[error("record {line}: unparsable timestamp {value:?}")]
    Timestamp { line: usize, value: String },

    #[error("record {line}: unknown region {value:?}")]
    UnknownRegion { line: usize, value: String },

    #[error("record {line}: {source}")]
    Invalid {
        line: usize,
        source: ValidationError,
    },

    #[error("rejected observation {id}: {source}")]
    Rejected {
        id: String,
        source: ValidationError,
    },
}

/// Filter parameters for catalog queries.
///
/// All fields optional; `limit` caps the newest-first result list.
#[derive(Debug, Clone, Default)]
pub struct ObservationQuery {
    pub region: Option<Region>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub min_magnitude: Option<f64>,
    pub max_magnitude: Option<f64>,
    pub limit: Option<usize>,
}

impl ObservationQuery {
    /// Default result cap when no explicit limit is given.
    pub const DEFAULT_LIMIT: usize = 100;

    fn matches(&self, obs: &Observation) -> bool {
        self.region.map_or(true, |r| obs.region == r)
            && self.start.map_or(true, |s| obs.timestamp >= s)
            && self.end.map_or(true, |e| obs.timestamp <= e)
            && self.min_magnitude.map_or(true, |m| obs.magnitude >= m)
            && self.max_magnitude.map_or(true, |m| obs.magnitude <= m)
    }
}

/// Per-region catalog summary for the regions listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: Region,
    pub observation_count: usize,
    pub latest_observation: Option<DateTime<Utc>>,
    pub mean_magnitude: f64,
}

/// Thread-safe observation repository.
pub struct ObservationStore {
    inner: RwLock<Vec<Observation>>,
}

impl ObservationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Vec::new()),
        }
    }

    /// Build a store from pre-validated observations.
    ///
    /// Each observation is still checked; the first invalid one aborts
    /// construction.
    pub fn with_observations(observations: Vec<Observation>) -> Result<Self, CatalogError> {
        for obs in &observations {
            obs.validate().map_err(|source| CatalogError::Rejected {
                id: obs.id.clone(),
                source,
            })?;
        }
        Ok(Self {
            inner: RwLock::new(observations),
        })
    }

    /// Load a store from a CSV catalog file.
    pub fn from_csv(path: &Path) -> Result<Self, CatalogError> {
        let observations = load_csv(path)?;
        Ok(Self {
            inner: RwLock::new(observations),
        })
    }

    /// Validate and append a single observation.
    pub fn insert(&self, obs: Observation) -> Result<(), CatalogError> {
        obs.validate().map_err(|source| CatalogError::Rejected {
            id: obs.id.clone(),
            source,
        })?;
        self.write_guard().push(obs);
        Ok(())
    }

    /// Owned, consistent copy of the full observation set.
    pub fn snapshot(&self) -> Vec<Observation> {
        self.read_guard().clone()
    }

    /// Filtered query, newest first, capped at the query limit.
    pub fn query(&self, query: &ObservationQuery) -> Vec<Observation> {
        let mut matched: Vec<Observation> = self
            .read_guard()
            .iter()
            .filter(|o| query.matches(o))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matched.truncate(query.limit.unwrap_or(ObservationQuery::DEFAULT_LIMIT));
        matched
    }

    /// One summary per region, in enumeration order.
    pub fn region_summaries(&self) -> Vec<RegionSummary> {
        let snapshot = self.read_guard();
        Region::ALL
            .iter()
            .map(|&region| {
                let bin: Vec<&Observation> =
                    snapshot.iter().filter(|o| o.region == region).collect();
                let mean_magnitude = if bin.is_empty() {
                    0.0
                } else {
                    bin.iter().map(|o| o.magnitude).sum::<f64>() / bin.len() as f64
                };
                RegionSummary {
                    region,
                    observation_count: bin.len(),
                    latest_observation: bin.iter().map(|o| o.timestamp).max(),
                    mean_magnitude,
                }
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    fn read_guard(&self) -> std::sync::RwLockReadGuard<'_, Vec<Observation>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_guard(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Observation>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ObservationStore {
    fn default() -> Self {
        Self::new()
    }
}
