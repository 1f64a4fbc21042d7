mod radar;

pub use radar::RadarChartRenderer;

use crate::assessment::domain::IndicatorSet;
use std::fmt::Debug;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChartError {
    #[error("chart snapshot must have non-zero dimensions, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },
    #[error("chart snapshot expected {expected} RGBA bytes, got {actual}")]
    BufferLength { expected: usize, actual: usize },
    #[error("chart renderer failed: {0}")]
    Render(String),
}

/// Lossless RGBA raster captured from the chart.
#[derive(Clone, PartialEq, Eq)]
pub struct ChartSnapshot {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl ChartSnapshot {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, ChartError> {
        if width == 0 || height == 0 {
            return Err(ChartError::EmptyDimensions { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(ChartError::BufferLength {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Height that keeps the native aspect ratio at the given width.
    pub fn scaled_height(&self, width: f32) -> f32 {
        width * self.height as f32 / self.width as f32
    }

    /// Pixels flattened onto a white background as packed RGB.
    pub fn to_rgb_on_white(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for pixel in self.rgba.chunks_exact(4) {
            let alpha = u16::from(pixel[3]);
            for channel in &pixel[..3] {
                let blended = (u16::from(*channel) * alpha + 255 * (255 - alpha)) / 255;
                rgb.push(blended as u8);
            }
        }
        rgb
    }
}

impl Debug for ChartSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSnapshot")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

pub trait ChartRenderer: Debug {
    fn render(&self, indicators: &IndicatorSet) -> Result<ChartSnapshot, ChartError>;
}

/// Owned chart value. Holds the snapshot of the last successful render, if any.
#[derive(Debug)]
pub struct ChartState<R: ChartRenderer> {
    renderer: R,
    snapshot: Option<ChartSnapshot>,
}

impl<R: ChartRenderer> ChartState<R> {
    /// Builds the chart and renders it once for the given readings.
    pub fn create(renderer: R, indicators: &IndicatorSet) -> Self {
        let mut state = Self {
            renderer,
            snapshot: None,
        };
        state.replace(indicators);
        state
    }

    /// Re-renders synchronously so the snapshot always reflects `indicators`.
    pub fn replace(&mut self, indicators: &IndicatorSet) {
        self.snapshot = match self.renderer.render(indicators) {
            Ok(snapshot) => {
                debug!(
                    width = snapshot.width(),
                    height = snapshot.height(),
                    "chart re-rendered"
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!(error = %err, "chart render failed; snapshot unavailable");
                None
            }
        };
    }

    pub fn destroy(&mut self) {
        self.snapshot = None;
    }

    pub fn snapshot(&self) -> Option<&ChartSnapshot> {
        self.snapshot.as_ref()
    }
}
