pub mod domain;
pub mod export;
pub mod recommendations;
pub mod scoring;
mod session;

pub use domain::{
    Activity, AssessmentInput, Indicator, IndicatorError, IndicatorSet, MetadataField,
    MetadataSection, ProjectMetadata, NOT_AVAILABLE,
};
pub use export::{write_csv, AssessmentRecord, ExportError};
pub use recommendations::{compute_recommendations, Recommendation, NO_SIGNIFICANT_RISK};
pub use scoring::{
    compute_risk_score, RiskAssessment, RiskColor, RiskLevel, RiskScore, ScoringError,
    WeightTable,
};
pub use session::{AssessmentSession, LiveAssessment};
