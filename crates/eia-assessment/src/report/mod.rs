pub mod canvas;
mod composer;
pub mod flow;
pub mod layout;
mod pdf;

#[cfg(test)]
mod tests;

pub use canvas::{Canvas, CanvasError};
pub use composer::{
    OutputName, ReportComposer, ReportError, ReportInput, ReportOutcome, REPORT_EXTENSION,
    REPORT_TITLE,
};
pub use flow::{wrap_text, PageFlow};
pub use layout::{FontTier, PageLayout, Rgb, TextStyle};
pub use pdf::PdfCanvas;
