//! Environmental impact assessment: weighted risk scoring, rule-based
//! recommendations and paginated report composition.

pub mod assessment;
pub mod chart;
pub mod config;
pub mod error;
pub mod report;
pub mod telemetry;
