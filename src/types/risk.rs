//! Risk assessment types, trend classification, and scoring policy constants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Region;

/// Fixed policy constants for risk factor extraction and scoring.
///
/// Tunable in source, not per call: every assessment in a deployment must
/// score on the same scale for levels to be comparable across regions.
pub mod risk_thresholds {
    /// Recent-activity window (days before the reference instant)
    pub const RECENT_WINDOW_DAYS: i64 = 30;
    /// Minimum magnitude counted as a major event
    pub const HIGH_MAGNITUDE_MIN: f64 = 6.0;
    /// Maximum depth (km) counted as shallow
    pub const SHALLOW_DEPTH_KM: f64 = 70.0;

    // === Recent-activity score contributions ===
    /// Recent count above this adds 3
    pub const RECENT_SURGE: usize = 10;
    /// Recent count above this adds 2
    pub const RECENT_ELEVATED: usize = 5;

    // === High-magnitude score contributions ===
    /// Major-event count above this adds 3
    pub const HIGH_MAG_SURGE: usize = 5;
    /// Major-event count above this adds 2
    pub const HIGH_MAG_ELEVATED: usize = 2;

    // === Score-to-level mapping ===
    /// Total score at or above this is HIGH
    pub const HIGH_RISK_SCORE: u8 = 5;
    /// Total score at or above this is MEDIUM
    pub const MEDIUM_RISK_SCORE: u8 = 3;

    // === Trend classification ===
    /// Minimum observations for any trend verdict
    pub const MIN_TREND_SAMPLES: usize = 10;
    /// Minimum distinct months for a frequency trend
    pub const MIN_TREND_MONTHS: usize = 6;
    /// Later-half mean must exceed earlier-half mean by this ratio
    pub const MAGNITUDE_TREND_RATIO: f64 = 0.1;
    /// Regression slope threshold (events per month)
    pub const FREQUENCY_SLOPE_THRESHOLD: f64 = 0.1;
}

/// Direction verdict for magnitude and frequency trends.
///
/// `InsufficientData` and `Unknown` are sentinels, not failures: sparse or
/// degenerate inputs downgrade the verdict instead of aborting the
/// assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
    /// Too few observations or too few distinct months
    InsufficientData,
    /// Computation degenerated (e.g. zero-variance regression)
    Unknown,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
            Trend::Stable => "stable",
            Trend::InsufficientData => "insufficient_data",
            Trend::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Composite risk category derived from the accumulated score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Map an accumulated score to a level.
    pub fn from_score(score: u8) -> Self {
        use risk_thresholds::{HIGH_RISK_SCORE, MEDIUM_RISK_SCORE};
        if score >= HIGH_RISK_SCORE {
            RiskLevel::High
        } else if score >= MEDIUM_RISK_SCORE {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Low
    }
}

/// Five-number summary of a sample.
///
/// Standard deviation is the sample estimate (Bessel's correction); all
/// fields are 0.0 for an empty sample and `std_dev` is 0.0 for n < 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DescriptiveStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Inclusive timestamp span of an observation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Full risk assessment over an observation set.
///
/// Recomputed from scratch on every call; nothing here is cached or
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Region filter applied, or `None` for the nationwide set
    pub region: Option<Region>,
    pub total_observations: usize,
    pub date_range: Option<DateRange>,
    pub magnitude: DescriptiveStats,
    pub depth: DescriptiveStats,
    /// Observation count per calendar month, keyed "YYYY-MM"
    pub monthly_distribution: BTreeMap<String, usize>,
    /// Observations within the trailing 30 days of the reference instant
    pub recent_activity_count: usize,
    /// Observations at or above magnitude 6.0
    pub high_magnitude_count: usize,
    /// Observations shallower than 70 km
    pub shallow_count: usize,
    pub magnitude_trend: Trend,
    pub frequency_trend: Trend,
    pub risk_score: u8,
    pub risk_level: RiskLevel,
}
