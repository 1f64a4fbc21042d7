use super::domain::{Indicator, IndicatorSet};
use serde::{Deserialize, Serialize};

const WEIGHT_TOLERANCE: f64 = 1e-6;
// Absorbs binary representation error so that exact halves round up.
const ROUNDING_NUDGE: f64 = 1e-9;

pub const LOW_RISK_CEILING: u8 = 30;
pub const MODERATE_RISK_CEILING: u8 = 60;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("weight for {} must be non-negative, got {weight}", .indicator.key())]
    NegativeWeight { indicator: Indicator, weight: f64 },
    #[error("indicator weights must sum to 1.0, got {sum:.6}")]
    UnbalancedWeights { sum: f64 },
}

/// Relative contribution of each indicator to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightTable {
    weights: [f64; 5],
}

impl WeightTable {
    pub const fn canonical() -> Self {
        Self {
            weights: [0.30, 0.25, 0.20, 0.15, 0.10],
        }
    }

    pub fn new(
        erosion: f64,
        vegetation: f64,
        water_quality: f64,
        habitat_disruption: f64,
        air_quality: f64,
    ) -> Result<Self, ScoringError> {
        let weights = [
            erosion,
            vegetation,
            water_quality,
            habitat_disruption,
            air_quality,
        ];

        for (indicator, weight) in Indicator::ordered().into_iter().zip(weights) {
            if weight.is_nan() || weight < 0.0 {
                return Err(ScoringError::NegativeWeight { indicator, weight });
            }
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ScoringError::UnbalancedWeights { sum });
        }

        Ok(Self { weights })
    }

    pub fn weight(&self, indicator: Indicator) -> f64 {
        self.weights[indicator.index()]
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Composite risk score, always within `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RiskScore(u8);

impl RiskScore {
    pub fn value(self) -> u8 {
        self.0
    }

    pub fn level(self) -> RiskLevel {
        RiskLevel::from_score(self)
    }
}

impl std::fmt::Display for RiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Low and moderate bands include their upper bound.
    pub fn from_score(score: RiskScore) -> Self {
        match score.value() {
            value if value <= LOW_RISK_CEILING => Self::Low,
            value if value <= MODERATE_RISK_CEILING => Self::Moderate,
            _ => Self::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }

    pub const fn display_label(self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Moderate => "Moderate Risk",
            Self::High => "High Risk",
        }
    }

    pub const fn color(self) -> RiskColor {
        match self {
            Self::Low => RiskColor::Green,
            Self::Moderate => RiskColor::Orange,
            Self::High => RiskColor::Red,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskColor {
    Green,
    Orange,
    Red,
}

impl RiskColor {
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Green => "#008000",
            Self::Orange => "#ffa500",
            Self::Red => "#ff0000",
        }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Green => (0x00, 0x80, 0x00),
            Self::Orange => (0xff, 0xa5, 0x00),
            Self::Red => (0xff, 0x00, 0x00),
        }
    }
}

/// Weighted share a single indicator adds to the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreContribution {
    pub indicator: Indicator,
    pub reading: u8,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub score: RiskScore,
    pub level: RiskLevel,
    pub contributions: Vec<ScoreContribution>,
}

pub fn compute_risk_score(indicators: &IndicatorSet, weights: &WeightTable) -> RiskAssessment {
    let contributions: Vec<ScoreContribution> = indicators
        .iter()
        .map(|(indicator, reading)| {
            let weight = weights.weight(indicator);
            ScoreContribution {
                indicator,
                reading,
                weight,
                contribution: f64::from(reading) * weight,
            }
        })
        .collect();

    let weighted: f64 = contributions.iter().map(|entry| entry.contribution).sum();
    let rounded = (weighted + ROUNDING_NUDGE).round();
    let score = RiskScore(rounded.clamp(0.0, 100.0) as u8);

    RiskAssessment {
        score,
        level: RiskLevel::from_score(score),
        contributions,
    }
}
