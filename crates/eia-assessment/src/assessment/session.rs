use super::domain::{
    Activity, AssessmentInput, Indicator, IndicatorError, IndicatorSet, ProjectMetadata,
};
use super::recommendations::{compute_recommendations, Recommendation};
use super::scoring::{compute_risk_score, RiskAssessment, WeightTable};
use crate::chart::{ChartRenderer, ChartSnapshot, ChartState};
use crate::report::ReportInput;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

/// Score, level and advisories derived from one set of readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveAssessment {
    pub assessment: RiskAssessment,
    pub recommendations: Vec<Recommendation>,
}

impl LiveAssessment {
    pub fn evaluate(indicators: &IndicatorSet, weights: &WeightTable) -> Self {
        Self {
            assessment: compute_risk_score(indicators, weights),
            recommendations: compute_recommendations(indicators),
        }
    }
}

/// Working state of an assessment in progress.
///
/// Derived values are recomputed on every read; only the inputs and the
/// chart snapshot are held.
#[derive(Debug)]
pub struct AssessmentSession<R: ChartRenderer> {
    indicators: IndicatorSet,
    weights: WeightTable,
    metadata: ProjectMetadata,
    activities: Vec<Activity>,
    chart: ChartState<R>,
}

impl<R: ChartRenderer> AssessmentSession<R> {
    pub fn new(input: AssessmentInput, weights: WeightTable, renderer: R) -> Self {
        let AssessmentInput {
            metadata,
            indicators,
            activities,
        } = input;
        let chart = ChartState::create(renderer, &indicators);
        Self {
            indicators,
            weights,
            metadata,
            activities,
            chart,
        }
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut ProjectMetadata {
        &mut self.metadata
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn set_activity(&mut self, name: &str, selected: bool) {
        match self.activities.iter_mut().find(|activity| activity.name == name) {
            Some(activity) => activity.selected = selected,
            None => self.activities.push(Activity::new(name, selected)),
        }
    }

    /// Applies one reading change, refreshes the chart, and returns the
    /// recomputed assessment. A rejected value leaves the session untouched.
    pub fn set_indicator(
        &mut self,
        indicator: Indicator,
        value: i64,
    ) -> Result<LiveAssessment, IndicatorError> {
        self.indicators = self.indicators.with(indicator, value)?;
        self.chart.replace(&self.indicators);
        debug!(indicator = indicator.key(), value, "indicator updated");
        Ok(self.assessment())
    }

    pub fn assessment(&self) -> LiveAssessment {
        LiveAssessment::evaluate(&self.indicators, &self.weights)
    }

    pub fn chart(&self) -> Option<&ChartSnapshot> {
        self.chart.snapshot()
    }

    pub fn clear_chart(&mut self) {
        self.chart.destroy();
    }

    /// Borrows everything a report run needs from this session.
    pub fn report_input<'a>(
        &'a self,
        live: &'a LiveAssessment,
        generated_on: NaiveDate,
    ) -> ReportInput<'a> {
        ReportInput {
            metadata: &self.metadata,
            activities: &self.activities,
            assessment: &live.assessment,
            recommendations: &live.recommendations,
            chart: self.chart.snapshot(),
            generated_on,
        }
    }
}
