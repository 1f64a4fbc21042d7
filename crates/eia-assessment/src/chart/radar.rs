use super::{ChartError, ChartRenderer, ChartSnapshot};
use crate::assessment::domain::{IndicatorSet, INDICATOR_MAX};
use std::f32::consts::{FRAC_PI_2, TAU};

const RING_STEP: u8 = 20;
const GRID: Rgba = Rgba(0xd0, 0xd0, 0xd0, 0xff);
const FILL: Rgba = Rgba(75, 192, 192, 51);
const OUTLINE: Rgba = Rgba(75, 192, 192, 0xff);
const BACKGROUND: Rgba = Rgba(0xff, 0xff, 0xff, 0xff);

#[derive(Debug, Clone, Copy)]
struct Rgba(u8, u8, u8, u8);

/// Rasterizes the indicator readings as a five-axis radar plot.
#[derive(Debug, Clone, Copy)]
pub struct RadarChartRenderer {
    size: u32,
}

impl RadarChartRenderer {
    pub fn new(size: u32) -> Self {
        Self { size }
    }
}

impl Default for RadarChartRenderer {
    fn default() -> Self {
        Self::new(400)
    }
}

impl ChartRenderer for RadarChartRenderer {
    fn render(&self, indicators: &IndicatorSet) -> Result<ChartSnapshot, ChartError> {
        if self.size < 16 {
            return Err(ChartError::Render(format!(
                "canvas of {}px is too small for a radar plot",
                self.size
            )));
        }

        let mut raster = Raster::new(self.size);
        let center = self.size as f32 / 2.0;
        let radius = center * 0.8;
        let axes = indicators.iter().count();

        let vertex = |axis: usize, value: f32| -> (f32, f32) {
            let angle = axis as f32 * TAU / axes as f32 - FRAC_PI_2;
            let reach = radius * value / f32::from(INDICATOR_MAX);
            (center + reach * angle.cos(), center + reach * angle.sin())
        };

        for ring in (RING_STEP..=INDICATOR_MAX).step_by(RING_STEP as usize) {
            let points: Vec<(f32, f32)> = (0..axes)
                .map(|axis| vertex(axis, f32::from(ring)))
                .collect();
            raster.stroke_polygon(&points, GRID, 1);
        }
        for axis in 0..axes {
            let (x, y) = vertex(axis, f32::from(INDICATOR_MAX));
            raster.line((center, center), (x, y), GRID, 1);
        }

        let data: Vec<(f32, f32)> = indicators
            .iter()
            .enumerate()
            .map(|(axis, (_, reading))| vertex(axis, f32::from(reading)))
            .collect();
        raster.fill_polygon(&data, FILL);
        raster.stroke_polygon(&data, OUTLINE, 2);

        ChartSnapshot::new(self.size, self.size, raster.pixels)
    }
}

struct Raster {
    size: u32,
    pixels: Vec<u8>,
}

impl Raster {
    fn new(size: u32) -> Self {
        let count = size as usize * size as usize;
        let mut pixels = Vec::with_capacity(count * 4);
        for _ in 0..count {
            pixels.extend_from_slice(&[BACKGROUND.0, BACKGROUND.1, BACKGROUND.2, BACKGROUND.3]);
        }
        Self { size, pixels }
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgba) {
        if x < 0 || y < 0 || x >= i64::from(self.size) || y >= i64::from(self.size) {
            return;
        }
        let offset = (y as usize * self.size as usize + x as usize) * 4;
        let alpha = u32::from(color.3);
        let source = [color.0, color.1, color.2];
        for (channel, value) in source.into_iter().enumerate() {
            let dest = u32::from(self.pixels[offset + channel]);
            self.pixels[offset + channel] =
                ((u32::from(value) * alpha + dest * (255 - alpha)) / 255) as u8;
        }
        self.pixels[offset + 3] = 0xff;
    }

    fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgba, thickness: i64) {
        let (dx, dy) = (to.0 - from.0, to.1 - from.1);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i64;
        let reach = thickness / 2;
        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = (from.0 + dx * t).round() as i64;
            let y = (from.1 + dy * t).round() as i64;
            for ox in -reach..thickness - reach {
                for oy in -reach..thickness - reach {
                    self.plot(x + ox, y + oy, color);
                }
            }
        }
    }

    // Opaque overwrite keeps overlapping strokes from darkening.
    fn plot(&mut self, x: i64, y: i64, color: Rgba) {
        if color.3 == 0xff {
            if x < 0 || y < 0 || x >= i64::from(self.size) || y >= i64::from(self.size) {
                return;
            }
            let offset = (y as usize * self.size as usize + x as usize) * 4;
            self.pixels[offset..offset + 4].copy_from_slice(&[color.0, color.1, color.2, color.3]);
        } else {
            self.blend(x, y, color);
        }
    }

    fn stroke_polygon(&mut self, points: &[(f32, f32)], color: Rgba, thickness: i64) {
        for (index, start) in points.iter().enumerate() {
            let end = points[(index + 1) % points.len()];
            self.line(*start, end, color, thickness);
        }
    }

    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let min_y = points.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor() as i64;
        let max_y = points
            .iter()
            .map(|p| p.1)
            .fold(f32::NEG_INFINITY, f32::max)
            .ceil() as i64;

        for y in min_y..=max_y {
            let scan = y as f32 + 0.5;
            let mut crossings: Vec<f32> = Vec::new();
            for (index, a) in points.iter().enumerate() {
                let b = points[(index + 1) % points.len()];
                if (a.1 <= scan && b.1 > scan) || (b.1 <= scan && a.1 > scan) {
                    crossings.push(a.0 + (scan - a.1) / (b.1 - a.1) * (b.0 - a.0));
                }
            }
            crossings.sort_by(f32::total_cmp);
            for pair in crossings.chunks_exact(2) {
                let start = pair[0].round() as i64;
                let end = pair[1].round() as i64;
                for x in start..end {
                    self.blend(x, y, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(snapshot: &ChartSnapshot, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * snapshot.width() + x) * 4) as usize;
        let rgba = snapshot.rgba();
        [rgba[offset], rgba[offset + 1], rgba[offset + 2], rgba[offset + 3]]
    }

    #[test]
    fn renders_square_opaque_raster() {
        let snapshot = RadarChartRenderer::new(64)
            .render(&IndicatorSet::uniform(50).expect("valid"))
            .expect("renders");
        assert_eq!((snapshot.width(), snapshot.height()), (64, 64));
        assert!(snapshot.rgba().chunks_exact(4).all(|px| px[3] == 0xff));
        // Corners sit outside the plot.
        assert_eq!(pixel(&snapshot, 0, 0), [0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn higher_readings_tint_more_area() {
        let renderer = RadarChartRenderer::new(128);
        let tinted = |value: i64| {
            renderer
                .render(&IndicatorSet::uniform(value).expect("valid"))
                .expect("renders")
                .rgba()
                .chunks_exact(4)
                .filter(|px| px[2] > px[0])
                .count()
        };
        assert!(tinted(90) > tinted(30));
    }

    #[test]
    fn refuses_degenerate_canvas() {
        let err = RadarChartRenderer::new(4)
            .render(&IndicatorSet::default())
            .expect_err("too small");
        assert!(matches!(err, ChartError::Render(_)));
    }
}
