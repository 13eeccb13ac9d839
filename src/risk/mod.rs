//! Risk and trend assessment over an observation set
//!
//! Builds a [`RiskAssessment`] from descriptive statistics, a monthly
//! distribution, split-half and regression trend verdicts, and a composite
//! score accumulated from fixed policy thresholds. Never fails on
//! well-formed input: empty and sparse sets degrade to zeroed statistics,
//! sentinel trends, and a LOW level.

pub mod stats;
pub mod trend;

use chrono::{DateTime, Duration, Utc};

use crate::types::risk_thresholds::{
    HIGH_MAG_ELEVATED, HIGH_MAG_SURGE, RECENT_ELEVATED, RECENT_SURGE, RECENT_WINDOW_DAYS,
};
use crate::types::{DateRange, Observation, Region, RiskAssessment, RiskLevel};

/// Assess an observation set as of the current instant.
pub fn assess(observations: &[Observation], region_filter: Option<Region>) -> RiskAssessment {
    assess_at(observations, region_filter, Utc::now())
}

/// Assess an observation set as of an explicit reference instant.
///
/// `now` anchors the recent-activity window; everything else is a pure
/// function of the input set. Exposed separately so callers (and tests)
/// can pin the reference time.
pub fn assess_at(
    observations: &[Observation],
    region_filter: Option<Region>,
    now: DateTime<Utc>,
) -> RiskAssessment {
    let mut filtered: Vec<&Observation> = observations
        .iter()
        .filter(|o| region_filter.map_or(true, |r| o.region == r))
        .collect();
    filtered.sort_by_key(|o| o.timestamp);

    let magnitudes: Vec<f64> = filtered.iter().map(|o| o.magnitude).collect();
    let depths: Vec<f64> = filtered.iter().map(|o| o.depth).collect();

    let recent_cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
    let recent_activity_count = filtered.iter().filter(|o| o.timestamp >= recent_cutoff).count();
    let high_magnitude_count = filtered.iter().filter(|o| o.is_high_magnitude()).count();
    let shallow_count = filtered.iter().filter(|o| o.is_shallow()).count();

    let risk_score = score_recent(recent_activity_count) + score_high_magnitude(high_magnitude_count);

    let date_range = match (filtered.first(), filtered.last()) {
        (Some(first), Some(last)) => Some(DateRange {
            start: first.timestamp,
            end: last.timestamp,
        }),
        _ => None,
    };

    RiskAssessment {
        region: region_filter,
        total_observations: filtered.len(),
        date_range,
        magnitude: stats::describe(&magnitudes),
        depth: stats::describe(&depths),
        monthly_distribution: stats::monthly_distribution(&filtered),
        recent_activity_count,
        high_magnitude_count,
        shallow_count,
        magnitude_trend: trend::magnitude_trend(&filtered),
        frequency_trend: trend::frequency_trend(&filtered),
        risk_score,
        risk_level: RiskLevel::from_score(risk_score),
    }
}

fn score_recent(count: usize) -> u8 {
    if count > RECENT_SURGE {
        3
    } else if count > RECENT_ELEVATED {
        2
    } else if count > 0 {
        1
    } else {
        0
    }
}

fn score_high_magnitude(count: usize) -> u8 {
    if count > HIGH_MAG_SURGE {
        3
    } else if count > HIGH_MAG_ELEVATED {
        2
    } else if count > 0 {
        1
    } else {
        0
    }
}
