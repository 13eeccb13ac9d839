//! Temporal feature extraction over region bins
//!
//! Computes one [`FeatureVector`] per declared region from a flat sequence
//! of observations: latest-event location fields, the gap between the two
//! most recent events, and rolling aggregates (frequency, mean/max
//! magnitude, seismic energy proxy) over count-based lookback windows.
//!
//! Pure and deterministic: same input sequence, same output map. The input
//! does not need to be pre-sorted; chronological order is established
//! internally with a stable sort, so equal timestamps keep input order.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::types::feature_windows::{LONG_LOOKBACK, SHORT_LOOKBACK};
use crate::types::{FeatureVector, Observation, Region};

/// Structural contract violation in extractor input.
///
/// Raised synchronously and totally: no partial result map is ever
/// returned. Numerical degeneracies (empty bins, single-event bins) are not
/// errors; they produce zeroed fields instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureError {
    #[error("observation {id} carries region {region}, which is not in the declared region set")]
    UndeclaredRegion { id: String, region: Region },
}

/// Extract one feature vector per declared region.
///
/// Every region in `regions` gets an entry, including bins with zero
/// observations. Fails with [`FeatureError::UndeclaredRegion`] if any
/// observation is tagged with a region outside `regions`.
pub fn extract_features(
    observations: &[Observation],
    regions: &[Region],
) -> Result<BTreeMap<Region, FeatureVector>, FeatureError> {
    for obs in observations {
        if !regions.contains(&obs.region) {
            return Err(FeatureError::UndeclaredRegion {
                id: obs.id.clone(),
                region: obs.region,
            });
        }
    }

    let mut ordered: Vec<&Observation> = observations.iter().collect();
    ordered.sort_by_key(|o| o.timestamp);

    let mut result = BTreeMap::new();
    for &region in regions {
        let bin: Vec<&Observation> = ordered.iter().copied().filter(|o| o.region == region).collect();
        result.insert(region, bin_features(region, &bin));
    }
    Ok(result)
}

/// Build the feature vector for one chronologically ordered bin.
fn bin_features(region: Region, bin: &[&Observation]) -> FeatureVector {
    let Some(latest) = bin.last() else {
        return FeatureVector::empty(region);
    };

    let time_since_last_hours = match bin.len() {
        0 | 1 => 0.0,
        n => {
            let gap = latest.timestamp - bin[n - 2].timestamp;
            gap.num_seconds() as f64 / 3600.0
        }
    };

    let short: Vec<f64> = trailing(bin, SHORT_LOOKBACK)
        .iter()
        .map(|o| o.magnitude)
        .collect();
    let long_count = trailing(bin, LONG_LOOKBACK).len();

    let avg_magnitude_30d = short.iter().sum::<f64>() / short.len() as f64;
    let max_magnitude_30d = short.iter().copied().fold(f64::MIN, f64::max);
    let seismic_energy_30d = short.iter().map(|m| m * m).sum();

    FeatureVector {
        region,
        latitude: latest.latitude,
        longitude: latest.longitude,
        depth: latest.depth,
        magnitude: latest.magnitude,
        time_since_last_hours,
        frequency_30d: short.len(),
        frequency_90d: long_count,
        avg_magnitude_30d,
        max_magnitude_30d,
        seismic_energy_30d,
    }
}

/// Last `n` elements of a bin (the whole bin when shorter).
fn trailing<'a>(bin: &'a [&'a Observation], n: usize) -> &'a [&'a Observation] {
    &bin[bin.len().saturating_sub(n)..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn obs(id: u32, region: Region, hours_offset: i64, magnitude: f64) -> Observation {
        let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        Observation {
            id: format!("EQ_{id:06}"),
            timestamp: base + Duration::hours(hours_offset),
            latitude: 14.6,
            longitude: 121.0,
            depth: 30.0,
            magnitude,
            region,
            location: None,
            source: "PHIVOLCS".to_string(),
        }
    }

    #[test]
    fn test_every_declared_region_present() {
        let observations = vec![obs(1, Region::Ncr, 0, 5.0)];
        let features = extract_features(&observations, &Region::ALL).unwrap();
        assert_eq!(features.len(), Region::ALL.len());
        // Bins without data still get a zeroed vector
        let empty = &features[&Region::RegionVII];
        assert_eq!(empty.frequency_30d, 0);
        assert_eq!(empty.magnitude, 0.0);
    }

    #[test]
    fn test_undeclared_region_rejected() {
        let observations = vec![obs(1, Region::Armm, 0, 5.0)];
        let declared = [Region::Ncr, Region::Car];
        let err = extract_features(&observations, &declared).unwrap_err();
        assert_eq!(
            err,
            FeatureError::UndeclaredRegion {
                id: "EQ_000001".to_string(),
                region: Region::Armm,
            }
        );
    }

    #[test]
    fn test_latest_observation_is_representative() {
        let mut observations = vec![obs(1, Region::Ncr, 0, 4.0), obs(2, Region::Ncr, 10, 6.5)];
        // Feed out of order; the extractor must sort internally
        observations.reverse();
        let features = extract_features(&observations, &[Region::Ncr]).unwrap();
        let v = &features[&Region::Ncr];
        assert_eq!(v.magnitude, 6.5);
        assert!((v.time_since_last_hours - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_observation_has_zero_gap() {
        let observations = vec![obs(1, Region::Ncr, 0, 5.0)];
        let features = extract_features(&observations, &[Region::Ncr]).unwrap();
        assert_eq!(features[&Region::Ncr].time_since_last_hours, 0.0);
        assert_eq!(features[&Region::Ncr].frequency_30d, 1);
    }

    #[test]
    fn test_short_window_caps_at_thirty_records() {
        // 31 events in one region: the short window must hold exactly 30
        let observations: Vec<_> = (0..31).map(|i| obs(i, Region::Ncr, i as i64, 4.0)).collect();
        let features = extract_features(&observations, &[Region::Ncr]).unwrap();
        let v = &features[&Region::Ncr];
        assert_eq!(v.frequency_30d, 30);
        assert_eq!(v.frequency_90d, 31);
    }

    #[test]
    fn test_window_aggregates_exclude_older_records() {
        // Oldest event has an outlier magnitude; with 31 records it falls
        // outside the short window and must not affect the aggregates
        let mut observations = vec![obs(0, Region::Ncr, 0, 9.9)];
        observations.extend((1..31).map(|i| obs(i, Region::Ncr, i as i64, 4.0)));
        let features = extract_features(&observations, &[Region::Ncr]).unwrap();
        let v = &features[&Region::Ncr];
        assert_eq!(v.max_magnitude_30d, 4.0);
        assert!((v.avg_magnitude_30d - 4.0).abs() < 1e-9);
        assert!((v.seismic_energy_30d - 30.0 * 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_max_magnitude_never_decreases_on_append() {
        let observations: Vec<_> = (0..10).map(|i| obs(i, Region::Ncr, i as i64, 4.0 + 0.1 * i as f64)).collect();
        let before = extract_features(&observations, &[Region::Ncr]).unwrap()[&Region::Ncr]
            .max_magnitude_30d;

        let mut appended = observations;
        appended.push(obs(99, Region::Ncr, 100, 7.5));
        let after = extract_features(&appended, &[Region::Ncr]).unwrap()[&Region::Ncr]
            .max_magnitude_30d;

        assert!(after >= before);
        assert_eq!(after, 7.5);
    }

    #[test]
    fn test_seismic_energy_is_sum_of_squares() {
        let observations = vec![
            obs(1, Region::Car, 0, 3.0),
            obs(2, Region::Car, 1, 4.0),
            obs(3, Region::Car, 2, 5.0),
        ];
        let features = extract_features(&observations, &[Region::Car]).unwrap();
        let v = &features[&Region::Car];
        assert!((v.seismic_energy_30d - (9.0 + 16.0 + 25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let observations: Vec<_> = (0..50)
            .map(|i| obs(i, Region::ALL[i as usize % 17], i as i64, 3.0 + (i % 5) as f64))
            .collect();
        let first = extract_features(&observations, &Region::ALL).unwrap();
        let second = extract_features(&observations, &Region::ALL).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input_yields_all_empty_bins() {
        let features = extract_features(&[], &Region::ALL).unwrap();
        assert_eq!(features.len(), 17);
        assert!(features.values().all(|v| v.frequency_90d == 0));
    }
}
