//! Font metrics for text fitting.
//!
//! A [`FontMetrics`] oracle answers whether a text run at a given size
//! fits a layout box. [`RustTypeMetrics`] measures with glyph advances from
//! the font files of a [`FontFamily`] located by the [`loader`].

use crate::compose::canvas::LayoutBox;

pub mod loader;
pub mod metrics;

pub use loader::{FontFamily, FontLoader};
pub use metrics::RustTypeMetrics;

/// Oracle deciding whether text fits a box at a font size.
pub trait FontMetrics {
    /// Typeface name written into text runs.
    fn family_name(&self) -> &str;

    /// Whether `text` at `size` points fits inside `layout`.
    fn fits(&self, text: &str, size: u32, bold: bool, layout: &LayoutBox)
    -> Result<bool, MetricsError>;
}

impl<T: FontMetrics + ?Sized> FontMetrics for &T {
    fn family_name(&self) -> &str {
        (**self).family_name()
    }

    fn fits(
        &self,
        text: &str,
        size: u32,
        bold: bool,
        layout: &LayoutBox,
    ) -> Result<bool, MetricsError> {
        (**self).fits(text, size, bold, layout)
    }
}

/// A single measurement failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MetricsError {
    #[error("Font has no glyph for {0:?}")]
    MissingGlyph(char),
    #[error("Unusable font size: {0}")]
    InvalidSize(u32),
}

#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),
    #[error("Invalid font data: {0}")]
    InvalidData(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
