use super::domain::{Indicator, IndicatorSet};
use serde::Serialize;

/// Readings strictly above this value trigger the indicator's advisory.
pub const RECOMMENDATION_THRESHOLD: u8 = 50;

pub const NO_SIGNIFICANT_RISK: &str = "No significant risks detected. Monitoring recommended.";

const RULES: [(Indicator, &str); 5] = [
    (
        Indicator::Erosion,
        "Implement erosion control measures such as sediment traps.",
    ),
    (
        Indicator::Vegetation,
        "Revegetate damaged areas with native species.",
    ),
    (
        Indicator::WaterQuality,
        "Minimize sediment runoff using buffer zones.",
    ),
    (
        Indicator::HabitatDisruption,
        "Preserve wildlife habitats and minimize disruptions.",
    ),
    (
        Indicator::AirQuality,
        "Reduce emissions and control dust in sensitive areas.",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// `None` for the monitoring sentinel.
    pub indicator: Option<Indicator>,
    pub message: &'static str,
}

impl Recommendation {
    pub fn is_sentinel(&self) -> bool {
        self.indicator.is_none()
    }
}

/// Advisories in indicator declaration order; never empty.
pub fn compute_recommendations(indicators: &IndicatorSet) -> Vec<Recommendation> {
    let triggered: Vec<Recommendation> = RULES
        .into_iter()
        .filter(|(indicator, _)| indicators.get(*indicator) > RECOMMENDATION_THRESHOLD)
        .map(|(indicator, message)| Recommendation {
            indicator: Some(indicator),
            message,
        })
        .collect();

    if triggered.is_empty() {
        vec![Recommendation {
            indicator: None,
            message: NO_SIGNIFICANT_RISK,
        }]
    } else {
        triggered
    }
}
