use super::canvas::{Canvas, CanvasError};
use super::layout::{PageLayout, TextStyle, PT_TO_MM};
use crate::chart::ChartSnapshot;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};

const FONT_RESOURCE: &str = "F1";

/// In-memory PDF canvas. Nothing touches disk until the caller persists
/// the bytes returned by [`Canvas::finish`].
#[derive(Debug)]
pub struct PdfCanvas {
    width: f32,
    height: f32,
    pages: Vec<Vec<Operation>>,
    active: Option<usize>,
    images: Vec<Stream>,
}

impl PdfCanvas {
    pub fn new(layout: &PageLayout) -> Self {
        Self {
            width: layout.page_width,
            height: layout.page_height,
            pages: Vec::new(),
            active: None,
            images: Vec::new(),
        }
    }

    fn operations(&mut self) -> Result<&mut Vec<Operation>, CanvasError> {
        let index = self.active.ok_or(CanvasError::NoActivePage)?;
        Ok(&mut self.pages[index])
    }

    fn to_points(mm: f32) -> f32 {
        mm / PT_TO_MM
    }

    // PDF user space grows upward from the bottom-left corner.
    fn flip_y(&self, y: f32) -> f32 {
        Self::to_points(self.height - y)
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.pages.push(Vec::new());
        self.active = Some(self.pages.len() - 1);
        Ok(())
    }

    fn set_page(&mut self, number: usize) -> Result<(), CanvasError> {
        if number == 0 || number > self.pages.len() {
            return Err(CanvasError::PageOutOfRange {
                requested: number,
                available: self.pages.len(),
            });
        }
        self.active = Some(number - 1);
        Ok(())
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn current_page_height(&self) -> f32 {
        self.height
    }

    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let thousandths: u32 = text.chars().map(|ch| u32::from(helvetica_advance(ch))).sum();
        thousandths as f32 / 1000.0 * font_size * PT_TO_MM
    }

    fn write_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), CanvasError> {
        let [r, g, b] = style.color.unit();
        let baseline = self.flip_y(y);
        let operations = self.operations()?;
        operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![FONT_RESOURCE.into(), Object::Real(style.font_size)],
            ),
            Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new(
                "Td",
                vec![Object::Real(Self::to_points(x)), Object::Real(baseline)],
            ),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
        Ok(())
    }

    fn draw_rule(
        &mut self,
        x1: f32,
        x2: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), CanvasError> {
        let [r, g, b] = style.color.unit();
        let y = self.flip_y(y);
        let operations = self.operations()?;
        operations.extend([
            Operation::new("RG", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("w", vec![Object::Real(0.75)]),
            Operation::new(
                "m",
                vec![Object::Real(Self::to_points(x1)), Object::Real(y)],
            ),
            Operation::new(
                "l",
                vec![Object::Real(Self::to_points(x2)), Object::Real(y)],
            ),
            Operation::new("S", vec![]),
        ]);
        Ok(())
    }

    fn draw_image(
        &mut self,
        image: &ChartSnapshot,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError> {
        let name = format!("Im{}", self.images.len());
        let bottom = self.flip_y(y + height);
        self.operations()?.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(Self::to_points(width)),
                    0.into(),
                    0.into(),
                    Object::Real(Self::to_points(height)),
                    Object::Real(Self::to_points(x)),
                    Object::Real(bottom),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.into_bytes())]),
            Operation::new("Q", vec![]),
        ]);

        self.images.push(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width()),
                "Height" => i64::from(image.height()),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            image.to_rgb_on_white(),
        ));
        Ok(())
    }

    fn finish(self) -> Result<Vec<u8>, CanvasError> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        for (index, image) in self.images.into_iter().enumerate() {
            let image_id = doc.add_object(image);
            xobjects.set(format!("Im{index}"), image_id);
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
            "XObject" => xobjects,
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let encoded = Content { operations }
                .encode()
                .map_err(|err| CanvasError::Encode(err.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    Object::Real(Self::to_points(self.width)),
                    Object::Real(Self::to_points(self.height)),
                ],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|err| CanvasError::Encode(err.to_string()))?;
        Ok(bytes)
    }
}

// Helvetica with WinAnsiEncoding: Latin-1 plus the cp1252 punctuation block.
// Anything else degrades to '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(ch: char) -> u8 {
    match ch {
        ' '..='~' | '\u{a0}'..='\u{ff}' => ch as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => b'?',
    }
}

/// Helvetica advance widths from the standard AFM, in thousandths of an em.
fn helvetica_advance(ch: char) -> u16 {
    const ASCII: [u16; 95] = [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
        1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
        667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
        333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
        556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
    ];
    match ch {
        ' '..='~' => ASCII[ch as usize - 0x20],
        '\u{2018}' | '\u{2019}' | '\u{201a}' => 222,
        '\u{201c}' | '\u{201d}' | '\u{201e}' => 333,
        '\u{2013}' | '\u{2022}' => 556,
        '\u{2014}' | '\u{2026}' | '\u{2030}' => 1000,
        '\u{20ac}' => 556,
        '\u{c6}' => 1000,
        '\u{152}' => 1000,
        '\u{e6}' => 889,
        '\u{153}' => 944,
        _ => 667,
    }
}
