//! Descriptive statistics and calendar grouping helpers

use chrono::Datelike;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

use crate::types::{DescriptiveStats, Observation};

/// Five-number summary of a sample.
///
/// Uses the sample standard deviation (Bessel's correction). Degenerate
/// samples never fail: an empty slice yields all zeros, a single value
/// yields zero spread.
pub fn describe(values: &[f64]) -> DescriptiveStats {
    if values.is_empty() {
        return DescriptiveStats::default();
    }

    let std_dev = if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    };

    DescriptiveStats {
        mean: values.iter().mean(),
        median: median(values),
        std_dev,
        min: values.iter().fold(f64::INFINITY, |a, b| a.min(*b)),
        max: values.iter().fold(f64::NEG_INFINITY, |a, b| a.max(*b)),
    }
}

/// Median of a non-empty sample (mean of the middle pair for even n).
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Canonical "YYYY-MM" key for an observation's calendar month.
pub fn month_key(obs: &Observation) -> String {
    format!("{:04}-{:02}", obs.timestamp.year(), obs.timestamp.month())
}

/// Observation count per calendar month.
///
/// `BTreeMap` keeps the keys in chronological order, since "YYYY-MM" sorts
/// lexicographically.
pub fn monthly_distribution(observations: &[&Observation]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for obs in observations {
        *counts.entry(month_key(obs)).or_insert(0) += 1;
    }
    counts
}
