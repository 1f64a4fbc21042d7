use super::canvas::{Canvas, CanvasError};
use super::flow::{wrap_text, PageFlow};
use super::layout::{FontTier, PageLayout, Rgb, TextStyle};
use crate::assessment::domain::{Activity, MetadataSection, ProjectMetadata};
use crate::assessment::recommendations::{Recommendation, NO_SIGNIFICANT_RISK};
use crate::assessment::scoring::RiskAssessment;
use crate::chart::ChartSnapshot;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

pub const REPORT_TITLE: &str = "Environmental Impact Assessment Report";
pub const REPORT_EXTENSION: &str = "pdf";

/// Result of asking the caller where the report should be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputName {
    Named(String),
    Cancelled,
}

impl OutputName {
    /// File stem to save under, or `None` when the run must not start.
    pub fn file_stem(&self) -> Option<String> {
        let OutputName::Named(raw) = self else {
            return None;
        };
        let trimmed = raw.trim();
        let stem = match trimmed.rsplit_once('.') {
            Some((stem, ext)) if ext.eq_ignore_ascii_case(REPORT_EXTENSION) => stem.trim(),
            _ => trimmed,
        };
        if stem.is_empty() {
            return None;
        }
        Some(stem.replace(&['/', '\\'][..], "_"))
    }
}

impl From<Option<String>> for OutputName {
    fn from(value: Option<String>) -> Self {
        value.map(OutputName::Named).unwrap_or(OutputName::Cancelled)
    }
}

/// Everything one report run reads. Scores are consumed, never recomputed.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub metadata: &'a ProjectMetadata,
    pub activities: &'a [Activity],
    pub assessment: &'a RiskAssessment,
    pub recommendations: &'a [Recommendation],
    pub chart: Option<&'a ChartSnapshot>,
    pub generated_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    Saved { path: PathBuf, pages: usize },
    Cancelled,
    /// Another run was already in flight; this trigger was ignored.
    Busy,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report composition failed: {0}")]
    Composition(#[from] CanvasError),
    #[error("failed to save report to {}: {source}", .path.display())]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct ReportComposer {
    layout: PageLayout,
    attribution: String,
    in_flight: AtomicBool,
}

impl ReportComposer {
    pub fn new(layout: PageLayout, attribution: impl Into<String>) -> Self {
        Self {
            layout,
            attribution: attribution.into(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    /// One composer run: lays out the report, encodes it and saves it.
    ///
    /// A cancelled or blank name returns before `open_canvas` is called. A
    /// composition fault discards every page and leaves nothing on disk.
    pub fn generate<C, F>(
        &self,
        name: OutputName,
        input: &ReportInput<'_>,
        output_dir: &Path,
        open_canvas: F,
    ) -> Result<ReportOutcome, ReportError>
    where
        C: Canvas,
        F: FnOnce(&PageLayout) -> C,
    {
        let Some(_run) = RunGuard::acquire(&self.in_flight) else {
            warn!("report generation already in progress; ignoring trigger");
            return Ok(ReportOutcome::Busy);
        };

        let Some(stem) = name.file_stem() else {
            info!("report generation cancelled before composition");
            return Ok(ReportOutcome::Cancelled);
        };

        let path = output_dir.join(format!("{stem}.{REPORT_EXTENSION}"));
        let mut canvas = open_canvas(&self.layout);

        let pages = self.compose(&mut canvas, input).map_err(|err| {
            error!(error = %err, "report composition failed; discarding pages");
            ReportError::Composition(err)
        })?;
        let bytes = canvas.finish().map_err(|err| {
            error!(error = %err, "report encoding failed");
            ReportError::Composition(err)
        })?;

        persist(&path, &bytes)?;
        info!(path = %path.display(), pages, bytes = bytes.len(), "report saved");

        Ok(ReportOutcome::Saved { path, pages })
    }

    /// Lays every section out, then stamps page footers. Returns the page count.
    pub fn compose<C: Canvas>(
        &self,
        canvas: &mut C,
        input: &ReportInput<'_>,
    ) -> Result<usize, CanvasError> {
        let mut writer = SectionWriter {
            canvas,
            flow: PageFlow::new(&self.layout),
            layout: &self.layout,
        };

        writer.paragraph(REPORT_TITLE, FontTier::Title, FontTier::Title.style())?;
        writer.body(&format!(
            "Generated: {}",
            input.generated_on.format("%Y-%m-%d")
        ))?;
        writer.divider()?;

        for section in [MetadataSection::ProjectDetails, MetadataSection::SiteInformation] {
            writer.heading(section.title())?;
            for field in section.fields() {
                writer.body(&format!(
                    "{}: {}",
                    field.label(),
                    input.metadata.display(*field)
                ))?;
            }
        }

        if !input.activities.is_empty() {
            writer.heading("Activities")?;
            for activity in input.activities {
                writer.body(&activity.checklist_line())?;
            }
        }

        let assessment = input.assessment;
        writer.heading("Risk Assessment")?;
        writer.body(&format!("Risk Score: {}", assessment.score))?;
        let (r, g, b) = assessment.level.color().rgb();
        writer.paragraph(
            &format!("Risk Level: {}", assessment.level.display_label()),
            FontTier::Body,
            FontTier::Body.style().with_color(Rgb(r, g, b)),
        )?;

        match input.chart {
            Some(chart) => writer.image(chart)?,
            None => info!("chart snapshot unavailable; omitting chart"),
        }

        writer.heading("Recommendations")?;
        if input.recommendations.is_empty() {
            writer.body(NO_SIGNIFICANT_RISK)?;
        }
        for recommendation in input.recommendations {
            if recommendation.is_sentinel() {
                writer.body(recommendation.message)?;
            } else {
                writer.body(&format!("- {}", recommendation.message))?;
            }
        }

        self.stamp_footers(writer.canvas)
    }

    fn stamp_footers<C: Canvas>(&self, canvas: &mut C) -> Result<usize, CanvasError> {
        let total = canvas.page_count();
        let style = FontTier::Footer.style();
        for number in 1..=total {
            canvas.set_page(number)?;
            let baseline = canvas.current_page_height() - self.layout.footer_offset;
            canvas.write_text(
                &format!("{} - Page {} of {}", self.attribution, number, total),
                self.layout.margin,
                baseline,
                &style,
            )?;
        }
        Ok(total)
    }
}

struct SectionWriter<'a, C> {
    canvas: &'a mut C,
    flow: PageFlow,
    layout: &'a PageLayout,
}

impl<C: Canvas> SectionWriter<'_, C> {
    fn heading(&mut self, text: &str) -> Result<(), CanvasError> {
        self.gap()?;
        self.paragraph(text, FontTier::Section, FontTier::Section.style())
    }

    fn body(&mut self, text: &str) -> Result<(), CanvasError> {
        self.paragraph(text, FontTier::Body, FontTier::Body.style())
    }

    // Each wrapped line is its own block, so a paragraph may straddle pages.
    fn paragraph(
        &mut self,
        text: &str,
        tier: FontTier,
        style: TextStyle,
    ) -> Result<(), CanvasError> {
        let lines = {
            let canvas: &C = &*self.canvas;
            wrap_text(text, self.layout.content_width, |line| {
                canvas.text_width(line, style.font_size)
            })
        };

        for line in lines {
            let top = self.flow.advance(self.canvas, tier.line_height())?;
            self.canvas
                .write_text(&line, self.layout.margin, top + style.ascent(), &style)?;
        }
        Ok(())
    }

    fn divider(&mut self) -> Result<(), CanvasError> {
        let top = self.flow.advance(self.canvas, self.layout.section_gap)?;
        let y = top + self.layout.section_gap / 2.0;
        self.canvas.draw_rule(
            self.layout.margin,
            self.layout.margin + self.layout.content_width,
            y,
            &FontTier::Section.style(),
        )
    }

    fn gap(&mut self) -> Result<(), CanvasError> {
        self.flow.advance(self.canvas, self.layout.section_gap)?;
        Ok(())
    }

    // Images are atomic: one reservation for the full height, never taller
    // than the flow area of a page.
    fn image(&mut self, chart: &ChartSnapshot) -> Result<(), CanvasError> {
        let mut width = self.layout.content_width;
        let mut height = chart.scaled_height(width);
        let usable = self.layout.flow_height();
        if height > usable {
            width *= usable / height;
            height = usable;
        }
        self.gap()?;
        let top = self.flow.advance(self.canvas, height)?;
        self.canvas
            .draw_image(chart, self.layout.margin, top, width, height)
    }
}

struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

// Written beside the target and renamed so a failed write never leaves a
// truncated report under the final name.
fn persist(path: &Path, bytes: &[u8]) -> Result<(), ReportError> {
    let staging = path.with_extension(format!("{REPORT_EXTENSION}.partial"));
    let result = fs::write(&staging, bytes).and_then(|_| fs::rename(&staging, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&staging);
        return Err(ReportError::Persist {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
