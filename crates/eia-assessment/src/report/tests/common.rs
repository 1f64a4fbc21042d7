use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use crate::assessment::domain::{Activity, IndicatorSet, ProjectMetadata};
use crate::assessment::recommendations::{compute_recommendations, Recommendation};
use crate::assessment::scoring::{compute_risk_score, RiskAssessment, WeightTable};
use crate::chart::{ChartSnapshot, ChartRenderer, RadarChartRenderer};
use crate::report::canvas::{Canvas, CanvasError};
use crate::report::layout::{PageLayout, TextStyle};
use crate::report::ReportComposer;

pub(super) const CHAR_WIDTH: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Call {
    NewPage,
    SetPage(usize),
    Text { page: usize, text: String, y: f32 },
    Rule { page: usize, y: f32 },
    Image { page: usize, y: f32, width: f32, height: f32 },
}

pub(super) type CallLog = Rc<RefCell<Vec<Call>>>;

/// Canvas double that records every call and measures text at a fixed
/// width per character.
#[derive(Debug, Default)]
pub(super) struct RecordingCanvas {
    pub(super) log: CallLog,
    pages: usize,
    active: usize,
    fail_on_text: Option<String>,
    page_height: Option<f32>,
}

impl RecordingCanvas {
    pub(super) fn new(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub(super) fn failing_on(log: CallLog, needle: &str) -> Self {
        Self {
            log,
            fail_on_text: Some(needle.to_string()),
            ..Self::default()
        }
    }

    pub(super) fn with_page_height(mut self, height: f32) -> Self {
        self.page_height = Some(height);
        self
    }
}

impl Canvas for RecordingCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.pages += 1;
        self.active = self.pages;
        self.log.borrow_mut().push(Call::NewPage);
        Ok(())
    }

    fn set_page(&mut self, number: usize) -> Result<(), CanvasError> {
        if number == 0 || number > self.pages {
            return Err(CanvasError::PageOutOfRange {
                requested: number,
                available: self.pages,
            });
        }
        self.active = number;
        self.log.borrow_mut().push(Call::SetPage(number));
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn current_page_height(&self) -> f32 {
        self.page_height.unwrap_or(297.0)
    }

    fn text_width(&self, text: &str, _font_size: f32) -> f32 {
        text.chars().count() as f32 * CHAR_WIDTH
    }

    fn write_text(
        &mut self,
        text: &str,
        _x: f32,
        y: f32,
        _style: &TextStyle,
    ) -> Result<(), CanvasError> {
        if let Some(needle) = &self.fail_on_text {
            if text.contains(needle.as_str()) {
                return Err(CanvasError::Encode(format!("refused to draw '{text}'")));
            }
        }
        self.log.borrow_mut().push(Call::Text {
            page: self.active,
            text: text.to_string(),
            y,
        });
        Ok(())
    }

    fn draw_rule(
        &mut self,
        _x1: f32,
        _x2: f32,
        y: f32,
        _style: &TextStyle,
    ) -> Result<(), CanvasError> {
        self.log.borrow_mut().push(Call::Rule {
            page: self.active,
            y,
        });
        Ok(())
    }

    fn draw_image(
        &mut self,
        _image: &ChartSnapshot,
        _x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError> {
        self.log.borrow_mut().push(Call::Image {
            page: self.active,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, CanvasError> {
        Ok(format!("{} pages", self.pages).into_bytes())
    }
}

pub(super) fn texts(log: &CallLog) -> Vec<String> {
    log.borrow()
        .iter()
        .filter_map(|call| match call {
            Call::Text { text, .. } => Some(text.clone()),
            _ => None,
        })
        .collect()
}

pub(super) fn composer() -> ReportComposer {
    ReportComposer::new(PageLayout::a4(), "EIA Field Tool")
}

pub(super) fn metadata() -> ProjectMetadata {
    ProjectMetadata {
        project_name: "Riverside Culvert Upgrade".to_string(),
        location: "Lot 12, Mill Creek".to_string(),
        assessor_name: "J. Ngata".to_string(),
        assessment_date: "2025-03-14".to_string(),
        project_description: "Replacement of a failed culvert beneath the access track."
            .to_string(),
        ..ProjectMetadata::default()
    }
}

pub(super) struct Fixture {
    pub(super) metadata: ProjectMetadata,
    pub(super) activities: Vec<Activity>,
    pub(super) assessment: RiskAssessment,
    pub(super) recommendations: Vec<Recommendation>,
    pub(super) chart: Option<ChartSnapshot>,
}

impl Fixture {
    pub(super) fn new(indicators: IndicatorSet) -> Self {
        Self {
            metadata: metadata(),
            activities: vec![
                Activity::new("Vegetation clearing", true),
                Activity::new("Instream works", false),
            ],
            assessment: compute_risk_score(&indicators, &WeightTable::canonical()),
            recommendations: compute_recommendations(&indicators),
            chart: RadarChartRenderer::new(40).render(&indicators).ok(),
        }
    }

    pub(super) fn with_chart(mut self, chart: ChartSnapshot) -> Self {
        self.chart = Some(chart);
        self
    }

    pub(super) fn without_chart(mut self) -> Self {
        self.chart = None;
        self
    }

    pub(super) fn input(&self) -> crate::report::ReportInput<'_> {
        crate::report::ReportInput {
            metadata: &self.metadata,
            activities: &self.activities,
            assessment: &self.assessment,
            recommendations: &self.recommendations,
            chart: self.chart.as_ref(),
            generated_on: NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date"),
        }
    }
}
