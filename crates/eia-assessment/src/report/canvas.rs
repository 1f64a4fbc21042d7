use super::layout::{TextStyle, PT_TO_MM};
use crate::chart::ChartSnapshot;

#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("page {requested} does not exist (document has {available})")]
    PageOutOfRange { requested: usize, available: usize },
    #[error("no page has been opened yet")]
    NoActivePage,
    #[error("failed to encode document: {0}")]
    Encode(String),
}

/// Drawing surface the composer lays content onto.
///
/// Coordinates are millimetres from the top-left corner of the active page.
/// Text `y` is the baseline; image `y` is the top edge.
pub trait Canvas {
    /// Appends a page and makes it the active one.
    fn new_page(&mut self) -> Result<(), CanvasError>;

    /// Activates an existing page, 1-based.
    fn set_page(&mut self, number: usize) -> Result<(), CanvasError>;

    fn page_count(&self) -> usize;

    fn current_page_height(&self) -> f32;

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        approximate_text_width(text, font_size)
    }

    fn write_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), CanvasError>;

    fn draw_rule(&mut self, x1: f32, x2: f32, y: f32, style: &TextStyle)
        -> Result<(), CanvasError>;

    fn draw_image(
        &mut self,
        image: &ChartSnapshot,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError>;

    /// Encodes every page into the final artifact.
    fn finish(self) -> Result<Vec<u8>, CanvasError>
    where
        Self: Sized;
}

/// Helvetica-like width estimate: narrow glyphs at a quarter em, wide at
/// three quarters, everything else half an em.
pub fn approximate_text_width(text: &str, font_size: f32) -> f32 {
    let em = font_size * PT_TO_MM;
    text.chars()
        .map(|ch| match ch {
            'i' | 'j' | 'l' | 'I' | '.' | ',' | ':' | ';' | '\'' | '!' | '|' | ' ' => 0.28,
            'm' | 'w' | 'M' | 'W' | '@' => 0.83,
            ch if ch.is_ascii_uppercase() => 0.67,
            _ => 0.55,
        })
        .sum::<f32>()
        * em
}
