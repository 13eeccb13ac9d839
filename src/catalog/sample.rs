//! Seeded synthetic catalog for development and tests
//!
//! Generated when no data file is configured. Distributions approximate the
//! national bulletin record: exponential depths (mean 50 km), magnitudes of
//! 2 plus an exponential tail (mean 3, clamped to the valid ceiling),
//! coordinates inside the Philippine bounding box, timestamps evenly spaced
//! across 2015-2024.

use chrono::{Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::Exp;

use crate::types::{Observation, Region};

/// Philippine bounding box (approximate).
const LAT_RANGE: (f64, f64) = (4.5, 21.5);
const LON_RANGE: (f64, f64) = (116.5, 126.5);

/// Default seed so development catalogs are reproducible across restarts.
pub const DEFAULT_SEED: u64 = 42;

/// Generate `count` valid synthetic observations.
pub fn generate(count: usize, seed: u64) -> Vec<Observation> {
    let mut rng = StdRng::seed_from_u64(seed);
    let depth_dist = Exp::new(1.0 / 50.0).expect("positive rate");
    let magnitude_dist = Exp::new(1.0 / 3.0).expect("positive rate");

    let start = Utc
        .with_ymd_and_hms(2015, 1, 1, 0, 0, 0)
        .single()
        .expect("valid calendar date");
    let end = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid calendar date");
    let span_seconds = (end - start).num_seconds();

    (0..count)
        .map(|i| {
            let offset = if count > 1 {
                span_seconds * i as i64 / (count as i64 - 1)
            } else {
                0
            };
            let magnitude: f64 = 2.0 + rng.sample(magnitude_dist);
            Observation {
                id: format!("EQ_{i:06}"),
                timestamp: start + Duration::seconds(offset),
                latitude: rng.gen_range(LAT_RANGE.0..LAT_RANGE.1),
                longitude: rng.gen_range(LON_RANGE.0..LON_RANGE.1),
                depth: rng.sample(depth_dist),
                magnitude: magnitude.min(10.0),
                region: Region::ALL[rng.gen_range(0..Region::ALL.len())],
                location: None,
                source: "synthetic".to_string(),
            }
        })
        .collect()
}
