use super::canvas::{Canvas, CanvasError};
use super::layout::PageLayout;
use tracing::debug;

/// Vertical cursor over the page currently being filled.
///
/// No page exists until the first block is placed.
#[derive(Debug, Clone, PartialEq)]
pub struct PageFlow {
    top_margin: f32,
    bottom_limit: f32,
    page: usize,
    cursor: f32,
}

impl PageFlow {
    pub fn new(layout: &PageLayout) -> Self {
        Self {
            top_margin: layout.margin,
            bottom_limit: layout.bottom_limit,
            page: 0,
            cursor: layout.margin,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    /// Reserves `height` units and returns the offset the block starts at.
    ///
    /// Breaks to a new page when the block would run past the bottom limit.
    /// A block taller than an entire page is placed at the top of a fresh
    /// page rather than breaking forever.
    pub fn advance<C: Canvas>(&mut self, canvas: &mut C, height: f32) -> Result<f32, CanvasError> {
        if self.page == 0 {
            canvas.new_page()?;
            self.page = 1;
            self.cursor = self.top_margin;
        }

        let page_is_empty = self.cursor <= self.top_margin;
        if self.cursor + height > self.bottom_limit && !page_is_empty {
            canvas.new_page()?;
            self.page += 1;
            self.cursor = self.top_margin;
            debug!(page = self.page, block_height = height, "page break");
        }

        let start = self.cursor;
        self.cursor += height;
        Ok(start)
    }
}

/// Greedy word wrap against `max_width`.
///
/// Explicit newlines always start a new line and words wider than the line
/// are split across lines. Always yields at least one line.
pub fn wrap_text<F>(text: &str, max_width: f32, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if measure(&candidate) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if measure(word) <= max_width {
                current = word.to_string();
            } else {
                for piece in split_long_word(word, max_width, &measure) {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                    current = piece;
                }
            }
        }

        lines.push(current);
    }

    lines
}

fn split_long_word<F>(word: &str, max_width: f32, measure: &F) -> Vec<String>
where
    F: Fn(&str) -> f32,
{
    let mut pieces = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if measure(&current) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(ch);
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}
