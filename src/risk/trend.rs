//! Trend classification for magnitude and event frequency
//!
//! Both classifiers are best-effort: sparse input downgrades to
//! `InsufficientData` and degenerate arithmetic downgrades to `Unknown`.
//! Neither ever aborts an assessment.

use crate::types::risk_thresholds::{
    FREQUENCY_SLOPE_THRESHOLD, MAGNITUDE_TREND_RATIO, MIN_TREND_MONTHS, MIN_TREND_SAMPLES,
};
use crate::types::{Observation, Trend};

use super::stats::monthly_distribution;

/// Split-half magnitude trend over a chronologically ordered set.
///
/// Compares the later half's mean magnitude to the earlier half's:
/// more than 10% above is `Increasing`, more than 10% below is
/// `Decreasing`, anything in between is `Stable`.
pub fn magnitude_trend(sorted: &[&Observation]) -> Trend {
    if sorted.len() < MIN_TREND_SAMPLES {
        return Trend::InsufficientData;
    }

    let mid = sorted.len() / 2;
    let earlier = mean_magnitude(&sorted[..mid]);
    let later = mean_magnitude(&sorted[mid..]);

    if !earlier.is_finite() || !later.is_finite() {
        return Trend::Unknown;
    }

    if later > earlier * (1.0 + MAGNITUDE_TREND_RATIO) {
        Trend::Increasing
    } else if later < earlier * (1.0 - MAGNITUDE_TREND_RATIO) {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Monthly frequency trend via an ordinary least-squares fit.
///
/// Groups the set by calendar month, fits a line to (month-index, count)
/// pairs, and classifies the slope against ±0.1 events per month.
pub fn frequency_trend(sorted: &[&Observation]) -> Trend {
    if sorted.len() < MIN_TREND_SAMPLES {
        return Trend::InsufficientData;
    }

    let monthly = monthly_distribution(sorted);
    if monthly.len() < MIN_TREND_MONTHS {
        return Trend::InsufficientData;
    }

    let counts: Vec<f64> = monthly.values().map(|&c| c as f64).collect();
    let Some(slope) = ols_slope(&counts) else {
        return Trend::Unknown;
    };

    if slope > FREQUENCY_SLOPE_THRESHOLD {
        Trend::Increasing
    } else if slope < -FREQUENCY_SLOPE_THRESHOLD {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

fn mean_magnitude(observations: &[&Observation]) -> f64 {
    observations.iter().map(|o| o.magnitude).sum::<f64>() / observations.len() as f64
}

/// Least-squares slope of `y` against its index sequence 0..n.
///
/// `None` for degenerate fits (fewer than two points, or a zero or
/// non-finite denominator).
fn ols_slope(y: &[f64]) -> Option<f64> {
    let n = y.len() as f64;
    if y.len() < 2 {
        return None;
    }

    let sum_x: f64 = (0..y.len()).map(|i| i as f64).sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = y.iter().enumerate().map(|(i, v)| i as f64 * v).sum();
    let sum_x2: f64 = (0..y.len()).map(|i| (i as f64).powi(2)).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    if denominator == 0.0 {
        return None;
    }

    let slope = (n * sum_xy - sum_x * sum_y) / denominator;
    slope.is_finite().then_some(slope)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Region;
    use chrono::{Duration, TimeZone, Utc};

    fn series(magnitudes: &[f64], hours_apart: i64) -> Vec<Observation> {
        let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| Observation {
                id: format!("EQ_{i:06}"),
                timestamp: base + Duration::hours(i as i64 * hours_apart),
                latitude: 14.6,
                longitude: 121.0,
                depth: 25.0,
                magnitude: m,
                region: Region::Ncr,
                location: None,
                source: "PHIVOLCS".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_magnitude_trend_needs_ten_samples() {
        let observations = series(&[4.0; 9], 1);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(magnitude_trend(&refs), Trend::InsufficientData);
    }

    #[test]
    fn test_magnitude_trend_increasing() {
        // Later half mean 5.0 vs earlier half mean 4.0: +25%
        let observations = series(&[4.0, 4.0, 4.0, 4.0, 4.0, 5.0, 5.0, 5.0, 5.0, 5.0], 1);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(magnitude_trend(&refs), Trend::Increasing);
    }

    #[test]
    fn test_magnitude_trend_decreasing() {
        let observations = series(&[5.0, 5.0, 5.0, 5.0, 5.0, 4.0, 4.0, 4.0, 4.0, 4.0], 1);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(magnitude_trend(&refs), Trend::Decreasing);
    }

    #[test]
    fn test_magnitude_trend_stable_within_ten_percent() {
        // Later half mean 4.2 vs earlier 4.0: +5%, inside the band
        let observations = series(&[4.0, 4.0, 4.0, 4.0, 4.0, 4.2, 4.2, 4.2, 4.2, 4.2], 1);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(magnitude_trend(&refs), Trend::Stable);
    }

    #[test]
    fn test_frequency_trend_needs_six_months() {
        // 12 events but all inside two months
        let observations = series(&[4.0; 12], 100);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(frequency_trend(&refs), Trend::InsufficientData);
    }

    #[test]
    fn test_frequency_trend_increasing() {
        // Month k gets k+1 events across 6 months: slope 1.0 per month
        let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        let mut observations = Vec::new();
        for month in 0..6u32 {
            for event in 0..=month {
                observations.push(Observation {
                    id: format!("EQ_{month}_{event}"),
                    timestamp: Utc
                        .with_ymd_and_hms(2023, month + 1, 1 + event, 0, 0, 0)
                        .unwrap(),
                    latitude: 14.6,
                    longitude: 121.0,
                    depth: 25.0,
                    magnitude: 4.0,
                    region: Region::Ncr,
                    location: None,
                    source: "PHIVOLCS".to_string(),
                });
            }
        }
        assert!(observations[0].timestamp >= base);
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(frequency_trend(&refs), Trend::Increasing);
    }

    #[test]
    fn test_frequency_trend_stable_for_flat_series() {
        // Two events in each of six months: slope 0
        let mut observations = Vec::new();
        for month in 1..=6u32 {
            for day in [5, 20] {
                observations.push(Observation {
                    id: format!("EQ_{month}_{day}"),
                    timestamp: Utc.with_ymd_and_hms(2023, month, day, 0, 0, 0).unwrap(),
                    latitude: 14.6,
                    longitude: 121.0,
                    depth: 25.0,
                    magnitude: 4.0,
                    region: Region::Ncr,
                    location: None,
                    source: "PHIVOLCS".to_string(),
                });
            }
        }
        let refs: Vec<&Observation> = observations.iter().collect();
        assert_eq!(frequency_trend(&refs), Trend::Stable);
    }

    #[test]
    fn test_ols_slope_degenerate_is_none() {
        assert_eq!(ols_slope(&[]), None);
        assert_eq!(ols_slope(&[3.0]), None);
    }

    #[test]
    fn test_ols_slope_known_line() {
        // y = 2x + 1
        let slope = ols_slope(&[1.0, 3.0, 5.0, 7.0]).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
    }
}
