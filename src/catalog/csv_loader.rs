//! CSV catalog ingestion
//!
//! Reads the flat bulletin export format:
//!
//! ```text
//! id,timestamp,latitude,longitude,depth,magnitude,region,location,source
//! EQ_000001,2023-06-15T04:30:00Z,14.6,121.0,33.0,5.4,NCR,Quezon City,PHIVOLCS
//! ```
//!
//! Timestamps are accepted as RFC 3339 or as naive `YYYY-MM-DD HH:MM:SS`
//! (interpreted as UTC). Every row passes full field validation; the first
//! bad row aborts the load with its line number.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::path::Path;

use super::CatalogError;
use crate::types::{Observation, Region};

#[derive(Debug, Deserialize)]
struct RawRecord {
    id: String,
    timestamp: String,
    latitude: f64,
    longitude: f64,
    depth: f64,
    magnitude: f64,
    region: String,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Load and validate a CSV observation catalog.
pub fn load_csv(path: &Path) -> Result<Vec<Observation>, CatalogError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut observations = Vec::new();

    for (index, record) in reader.deserialize::<RawRecord>().enumerate() {
        // Line 1 is the header
        let line = index + 2;
        let raw = record?;

        let timestamp = parse_timestamp(&raw.timestamp).ok_or_else(|| CatalogError::Timestamp {
            line,
            value: raw.timestamp.clone(),
        })?;

        let region: Region = raw.region.parse().map_err(|_| CatalogError::UnknownRegion {
            line,
            value: raw.region.clone(),
        })?;

        let obs = Observation {
            id: raw.id,
            timestamp,
            latitude: raw.latitude,
            longitude: raw.longitude,
            depth: raw.depth,
            magnitude: raw.magnitude,
            region,
            location: raw.location.filter(|l| !l.is_empty()),
            source: raw
                .source
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "PHIVOLCS".to_string()),
        };
        obs.validate()
            .map_err(|source| CatalogError::Invalid { line, source })?;
        observations.push(obs);
    }

    tracing::info!(count = observations.len(), path = %path.display(), "loaded observation catalog");
    Ok(observations)
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    None
}
