//! Glyph-advance text measurement backed by `rusttype`.

use super::{FontError, FontFamily, FontMetrics, MetricsError};
use crate::common::unit::inches_to_pt;
use crate::compose::canvas::LayoutBox;
use rusttype::{Font, GlyphId, Scale};
use std::fmt;

/// Default left and right text inset of a text box, in inches.
pub const HORIZONTAL_INSET: f64 = 0.1;
/// Default top and bottom text inset of a text box, in inches.
pub const VERTICAL_INSET: f64 = 0.05;

/// Size of a measured text block in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextExtent {
    /// Advance of the widest line
    pub width: f64,
    /// Line count times line height
    pub height: f64,
}

impl TextExtent {
    /// Whether the block fits the box once the text insets are taken off.
    pub fn fits_within(&self, layout: &LayoutBox) -> bool {
        let available_width = inches_to_pt(layout.width - 2.0 * HORIZONTAL_INSET);
        let available_height = inches_to_pt(layout.height - 2.0 * VERTICAL_INSET);
        available_width > 0.0
            && available_height > 0.0
            && self.width <= available_width
            && self.height <= available_height
    }
}

/// Font metrics of one family, regular and bold faces.
pub struct RustTypeMetrics {
    family: String,
    regular: Font<'static>,
    bold: Option<Font<'static>>,
}

impl fmt::Debug for RustTypeMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RustTypeMetrics")
            .field("family", &self.family)
            .field("has_bold", &self.bold.is_some())
            .finish()
    }
}

impl RustTypeMetrics {
    /// Parse the faces of a family from raw TrueType/OpenType data.
    pub fn from_bytes(
        family: impl Into<String>,
        regular: Vec<u8>,
        bold: Option<Vec<u8>>,
    ) -> Result<Self, FontError> {
        let family = family.into();
        let regular = Font::try_from_vec(regular)
            .ok_or_else(|| FontError::InvalidData(format!("{} regular face", family)))?;
        let bold = match bold {
            Some(data) => Some(
                Font::try_from_vec(data)
                    .ok_or_else(|| FontError::InvalidData(format!("{} bold face", family)))?,
            ),
            None => None,
        };
        Ok(Self {
            family,
            regular,
            bold,
        })
    }

    /// Load the faces of a family from disk.
    pub fn from_family(family: &FontFamily) -> Result<Self, FontError> {
        let regular = std::fs::read(&family.regular)?;
        let bold = family.bold.as_ref().map(std::fs::read).transpose()?;
        Self::from_bytes(family.name.clone(), regular, bold)
    }

    fn face(&self, bold: bool) -> &Font<'static> {
        if bold {
            self.bold.as_ref().unwrap_or(&self.regular)
        } else {
            &self.regular
        }
    }

    /// Measure `text` at `size` points. Lines break only at `\n`.
    pub fn measure(&self, text: &str, size: u32, bold: bool) -> Result<TextExtent, MetricsError> {
        if size == 0 {
            return Err(MetricsError::InvalidSize(size));
        }
        let font = self.face(bold);

        // rusttype scales by ascent - descent, not by the em square
        let unscaled = font.v_metrics_unscaled();
        let units_per_em = f32::from(font.units_per_em());
        if units_per_em <= 0.0 || unscaled.ascent - unscaled.descent <= 0.0 {
            return Err(MetricsError::InvalidSize(size));
        }
        let scale = Scale::uniform(size as f32 * (unscaled.ascent - unscaled.descent) / units_per_em);
        let v_metrics = font.v_metrics(scale);
        let line_height = f64::from(v_metrics.ascent - v_metrics.descent + v_metrics.line_gap);

        let mut width = 0.0f64;
        let mut lines = 0usize;
        for line in text.split('\n') {
            width = width.max(line_advance(font, scale, line)?);
            lines += 1;
        }

        Ok(TextExtent {
            width,
            height: lines as f64 * line_height,
        })
    }
}

fn line_advance(font: &Font<'static>, scale: Scale, line: &str) -> Result<f64, MetricsError> {
    let mut advance = 0.0f32;
    let mut previous: Option<GlyphId> = None;
    for c in line.chars().filter(|c| !c.is_control()) {
        let glyph = font.glyph(c);
        let id = glyph.id();
        if id.0 == 0 {
            return Err(MetricsError::MissingGlyph(c));
        }
        if let Some(prev) = previous {
            advance += font.pair_kerning(scale, prev, id);
        }
        advance += glyph.scaled(scale).h_metrics().advance_width;
        previous = Some(id);
    }
    Ok(f64::from(advance))
}

impl FontMetrics for RustTypeMetrics {
    fn family_name(&self) -> &str {
        &self.family
    }

    fn fits(
        &self,
        text: &str,
        size: u32,
        bold: bool,
        layout: &LayoutBox,
    ) -> Result<bool, MetricsError> {
        let extent = self.measure(text, size, bold)?;
        Ok(extent.fits_within(layout))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM_FONT_CANDIDATES: &[&str] = &[
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:\\Windows\\Fonts\\arial.ttf",
    ];

    fn system_font() -> Option<RustTypeMetrics> {
        SYSTEM_FONT_CANDIDATES
            .iter()
            .find_map(|path| std::fs::read(path).ok())
            .and_then(|data| RustTypeMetrics::from_bytes("Test", data, None).ok())
    }

    #[test]
    fn test_extent_respects_insets() {
        let layout = LayoutBox::new(0.0, 0.0, 2.2, 1.1);
        // 2.0in x 1.0in usable
        assert!(TextExtent { width: 144.0, height: 72.0 }.fits_within(&layout));
        assert!(!TextExtent { width: 144.5, height: 72.0 }.fits_within(&layout));
        assert!(!TextExtent { width: 10.0, height: 72.5 }.fits_within(&layout));
    }

    #[test]
    fn test_degenerate_box_never_fits() {
        let layout = LayoutBox::new(0.0, 0.0, 0.1, 0.05);
        assert!(!TextExtent { width: 0.0, height: 0.0 }.fits_within(&layout));
    }

    #[test]
    fn test_invalid_font_data() {
        let result = RustTypeMetrics::from_bytes("Broken", vec![0, 1, 2, 3], None);
        assert!(matches!(result, Err(FontError::InvalidData(_))));
    }

    #[test]
    fn test_measure_with_system_font() {
        let Some(metrics) = system_font() else {
            return;
        };
        assert_eq!(metrics.measure("A", 0, false), Err(MetricsError::InvalidSize(0)));

        let small = metrics.measure("Bees", 10, false).unwrap();
        let large = metrics.measure("Bees", 40, false).unwrap();
        assert!(large.width > small.width);
        assert!(large.height > small.height);

        let two_lines = metrics.measure("Bees\nBees", 10, false).unwrap();
        assert!((two_lines.height - 2.0 * small.height).abs() < 1e-6);
        assert!((two_lines.width - small.width).abs() < 1e-6);

        let wide = LayoutBox::new(0.0, 0.0, 15.0, 1.5);
        assert!(metrics.fits("Bees", 20, false, &wide).unwrap());
        assert!(!metrics.fits("Bees", 400, false, &wide).unwrap());
    }
}
