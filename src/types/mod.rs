//! Shared data structures for the earthquake analytics pipeline
//!
//! - Observation: validated seismic event records and the Region enumeration
//! - FeatureVector: per-region trailing-window snapshots
//! - RiskAssessment: descriptive statistics, trends, and composite scoring
//! - Forecast: magnitude forecast request/response surface

mod features;
mod forecast;
mod observation;
// Public because it contains the `risk_thresholds` policy-constant module,
// which must remain accessible as `types::risk_thresholds`.
pub mod risk;

pub use features::*;
pub use forecast::*;
pub use observation::*;
pub use risk::*;
