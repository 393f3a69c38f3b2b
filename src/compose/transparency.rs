//! Translucent shape fills.
//!
//! The typed shape API only knows solid colors. Opacity is written by
//! editing the fill markup: the `a:srgbClr` element of the solid fill gets an
//! `a:alpha` modifier.

use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::{MutableShape, RgbColor, XmlElement};

/// DrawingML percentage for fully opaque.
const ALPHA_OPAQUE: f64 = 100_000.0;

/// Convert a transparency fraction (0 opaque, 1 invisible) to the
/// `a:alpha` value, which measures opacity in thousandths of a percent.
pub fn alpha_value(transparency: f64) -> u32 {
    let transparency = if transparency.is_nan() {
        0.0
    } else {
        transparency.clamp(0.0, 1.0)
    };
    ((1.0 - transparency) * ALPHA_OPAQUE).round() as u32
}

/// Fill `shape` with `color` at the given transparency.
///
/// Re-applying with the same arguments leaves the shape unchanged.
pub fn apply_translucent_fill(
    shape: &mut MutableShape,
    color: RgbColor,
    transparency: f64,
) -> Result<()> {
    shape.set_solid_fill(color)?;

    let shape_id = shape.shape_id();
    let color_element = shape
        .fill_markup_mut()
        .and_then(|fill| fill.child_mut("a:srgbClr"))
        .ok_or_else(|| {
            OoxmlError::InvalidFormat(format!("shape {} has no solid color fill", shape_id))
        })?;

    color_element.remove_children("a:alpha");
    color_element.push_child(
        XmlElement::new("a:alpha").with_attr("val", alpha_value(transparency).to_string()),
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::MutableSlide;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn serialize(shape: &MutableShape) -> String {
        shape.fill_markup().unwrap().to_xml().unwrap()
    }

    fn alpha_count(xml: &str) -> usize {
        let mut reader = Reader::from_str(xml);
        let mut count = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) | Event::Start(e) if e.name().as_ref() == b"a:alpha" => count += 1,
                Event::Eof => break,
                _ => {},
            }
        }
        count
    }

    #[test]
    fn test_alpha_value() {
        assert_eq!(alpha_value(0.5), 50_000);
        assert_eq!(alpha_value(0.0), 100_000);
        assert_eq!(alpha_value(1.0), 0);
        assert_eq!(alpha_value(0.2), 80_000);
        assert_eq!(alpha_value(7.0), 0);
        assert_eq!(alpha_value(-1.0), 100_000);
    }

    #[test]
    fn test_translucent_fill_markup() {
        let mut slide = MutableSlide::new(256);
        let shape = slide.add_text_box("Bees", 0, 0, 10, 10);
        apply_translucent_fill(shape, RgbColor::WHITE, 0.5).unwrap();

        let xml = serialize(shape);
        assert_eq!(
            xml,
            r#"<a:solidFill><a:srgbClr val="FFFFFF"><a:alpha val="50000"/></a:srgbClr></a:solidFill>"#
        );
    }

    #[test]
    fn test_translucent_fill_is_idempotent() {
        let mut slide = MutableSlide::new(256);
        let shape = slide.add_text_box("Bees", 0, 0, 10, 10);
        apply_translucent_fill(shape, RgbColor::WHITE, 0.5).unwrap();
        let once = serialize(shape);
        apply_translucent_fill(shape, RgbColor::WHITE, 0.5).unwrap();
        let twice = serialize(shape);

        assert_eq!(once, twice);
        assert_eq!(alpha_count(&twice), 1);
    }

    #[test]
    fn test_stale_alpha_is_replaced() {
        let mut slide = MutableSlide::new(256);
        let shape = slide.add_text_box("Bees", 0, 0, 10, 10);
        shape.set_solid_fill(RgbColor::WHITE).unwrap();
        shape
            .fill_markup_mut()
            .and_then(|fill| fill.child_mut("a:srgbClr"))
            .unwrap()
            .push_child(XmlElement::new("a:alpha").with_attr("val", "1000"));

        apply_translucent_fill(shape, RgbColor::WHITE, 0.25).unwrap();
        let xml = serialize(shape);
        assert_eq!(alpha_count(&xml), 1);
        assert!(xml.contains(r#"<a:alpha val="75000"/>"#));
    }

    #[test]
    fn test_picture_has_no_fill() {
        let mut slide = MutableSlide::new(256);
        let index = slide
            .add_picture_from_bytes(PNG_MAGIC.to_vec(), 0, 0, 10, 10, None)
            .unwrap();
        let picture = slide.shape_mut(index).unwrap();
        let result = apply_translucent_fill(picture, RgbColor::WHITE, 0.5);
        assert!(matches!(result, Err(OoxmlError::InvalidFormat(_))));
    }
}
