/// Millimetres per typographic point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const fn from_hex(value: u32) -> Self {
        Self((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn unit(self) -> [f32; 3] {
        [self.0, self.1, self.2].map(|channel| f32::from(channel) / 255.0)
    }
}

pub const HEADING_COLOR: Rgb = Rgb::from_hex(0x2a6f4b);
pub const BODY_COLOR: Rgb = Rgb::from_hex(0x333333);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontTier {
    Title,
    Section,
    Body,
    Footer,
}

impl FontTier {
    pub const fn size(self) -> f32 {
        match self {
            Self::Title => 18.0,
            Self::Section => 14.0,
            Self::Body => 12.0,
            Self::Footer => 10.0,
        }
    }

    pub fn line_height(self) -> f32 {
        self.size() * 0.5
    }

    pub const fn color(self) -> Rgb {
        match self {
            Self::Title | Self::Section => HEADING_COLOR,
            Self::Body | Self::Footer => BODY_COLOR,
        }
    }

    pub fn style(self) -> TextStyle {
        TextStyle {
            font_size: self.size(),
            color: self.color(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub font_size: f32,
    pub color: Rgb,
}

impl TextStyle {
    pub fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }

    /// Distance from the top of a line box to the text baseline.
    pub fn ascent(&self) -> f32 {
        self.font_size * PT_TO_MM * 0.8
    }
}

/// Page geometry in millimetres, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub bottom_limit: f32,
    pub content_width: f32,
    pub footer_offset: f32,
    pub section_gap: f32,
}

impl PageLayout {
    /// A4 portrait.
    pub const fn a4() -> Self {
        Self {
            page_width: 210.0,
            page_height: 297.0,
            margin: 10.0,
            bottom_limit: 270.0,
            content_width: 180.0,
            footer_offset: 10.0,
            section_gap: 4.0,
        }
    }

    /// Vertical space available to flowed content on one page.
    pub fn flow_height(&self) -> f32 {
        self.bottom_limit - self.margin
    }
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::a4()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_decode_from_hex() {
        assert_eq!(HEADING_COLOR, Rgb(0x2a, 0x6f, 0x4b));
        assert_eq!(BODY_COLOR, Rgb(0x33, 0x33, 0x33));
    }

    #[test]
    fn body_lines_are_six_units_tall() {
        assert_eq!(FontTier::Body.line_height(), 6.0);
        assert_eq!(FontTier::Title.line_height(), 9.0);
        assert_eq!(PageLayout::a4().flow_height(), 260.0);
    }
}
