/// Shape types and implementation for PPTX presentations.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::markup::{XmlElement, solid_fill};
use std::fmt::Write as FmtWrite;

// Import shared format types
pub use super::super::format::{
    ImageFormat, RgbColor, TextAlign, TextFormat, TextFrameFormat, VerticalAnchor,
};

/// A shape on a slide (text box or picture).
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID
    pub(crate) shape_id: u32,
    /// Shape type
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    TextBox {
        text: String,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        format: TextFormat,
        frame: TextFrameFormat,
        /// Fill of the shape geometry, kept as markup so that properties
        /// without a typed setter can be patched in.
        fill: Option<XmlElement>,
    },
    Picture {
        data: Vec<u8>,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: String,
    },
}

impl MutableShape {
    /// Create a new text box shape.
    pub(crate) fn new_text_box(
        shape_id: u32,
        text: String,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format: TextFormat::default(),
                frame: TextFrameFormat::default(),
                fill: None,
            },
        }
    }

    /// Create a new picture shape.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_picture(
        shape_id: u32,
        data: Vec<u8>,
        format: ImageFormat,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: String,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Picture {
                data,
                format,
                x,
                y,
                width,
                height,
                description,
            },
        }
    }

    /// Get the shape ID.
    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Whether this shape is a picture.
    pub fn is_picture(&self) -> bool {
        matches!(self.shape_type, ShapeType::Picture { .. })
    }

    /// Position and extents as `(x, y, width, height)` in EMUs.
    pub fn bounds(&self) -> (i64, i64, i64, i64) {
        match &self.shape_type {
            ShapeType::TextBox {
                x,
                y,
                width,
                height,
                ..
            }
            | ShapeType::Picture {
                x,
                y,
                width,
                height,
                ..
            } => (*x, *y, *width, *height),
        }
    }

    /// Text of a text box.
    pub fn text(&self) -> Option<&str> {
        match &self.shape_type {
            ShapeType::TextBox { text, .. } => Some(text.as_str()),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Text formatting of a text box.
    pub fn text_format(&self) -> Option<&TextFormat> {
        match &self.shape_type {
            ShapeType::TextBox { format, .. } => Some(format),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Set text frame properties for this shape (only for text boxes).
    pub fn set_frame_format(&mut self, frame: TextFrameFormat) -> &mut Self {
        if let ShapeType::TextBox {
            frame: ref mut f, ..
        } = self.shape_type
        {
            *f = frame;
        }
        self
    }

    /// Builder method: set font.
    pub fn font(&mut self, font: &str) -> &mut Self {
        if let ShapeType::TextBox {
            format: ref mut f, ..
        } = self.shape_type
        {
            f.font = Some(font.to_string());
        }
        self
    }

    /// Builder method: set font size in points.
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        if let ShapeType::TextBox {
            format: ref mut f, ..
        } = self.shape_type
        {
            f.size = Some(size);
        }
        self
    }

    /// Builder method: set bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        if let ShapeType::TextBox {
            format: ref mut f, ..
        } = self.shape_type
        {
            f.bold = Some(bold);
        }
        self
    }

    /// Fill the shape geometry with a solid color.
    ///
    /// Replaces any previous fill, including modifiers patched into its markup.
    pub fn set_solid_fill(&mut self, color: RgbColor) -> Result<&mut Self> {
        match self.shape_type {
            ShapeType::TextBox { ref mut fill, .. } => {
                *fill = Some(solid_fill(&color.to_hex()));
                Ok(self)
            },
            ShapeType::Picture { .. } => Err(OoxmlError::InvalidFormat(format!(
                "shape {} is a picture and has no geometry fill",
                self.shape_id
            ))),
        }
    }

    /// The fill markup, if a fill has been set.
    pub fn fill_markup(&self) -> Option<&XmlElement> {
        match &self.shape_type {
            ShapeType::TextBox { fill, .. } => fill.as_ref(),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Mutable access to the fill markup for low-level property edits.
    pub fn fill_markup_mut(&mut self) -> Option<&mut XmlElement> {
        match &mut self.shape_type {
            ShapeType::TextBox { fill, .. } => fill.as_mut(),
            ShapeType::Picture { .. } => None,
        }
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn get_image_data(&self) -> Option<(&[u8], ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data.as_slice(), *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// For pictures, the relationship ID is optional. If not provided, a placeholder will be used.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format,
                frame,
                fill,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                match fill {
                    Some(fill) => xml.push_str(&fill.to_xml()?),
                    None => xml.push_str("<a:noFill/>"),
                }
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                write!(
                    xml,
                    r#"<a:bodyPr wrap="{}" rtlCol="0" anchor="{}">"#,
                    if frame.word_wrap { "square" } else { "none" },
                    frame.anchor.as_attr()
                )?;
                xml.push_str("<a:noAutofit/>");
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                xml.push_str("<a:p>");
                write!(xml, r#"<a:pPr algn="{}"/>"#, frame.align.as_attr())?;

                // Explicit newlines become line breaks inside the paragraph.
                for (index, line) in text.split('\n').enumerate() {
                    if index > 0 {
                        xml.push_str("<a:br>");
                        write_run_properties(xml, format, "a:rPr")?;
                        xml.push_str("</a:br>");
                    }
                    xml.push_str("<a:r>");
                    write_run_properties(xml, format, "a:rPr")?;
                    write!(xml, "<a:t>{}</a:t>", escape_xml(line.trim_end_matches('\r')))?;
                    xml.push_str("</a:r>");
                }
                write_run_properties(xml, format, "a:endParaRPr")?;

                xml.push_str("</a:p>");
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                x,
                y,
                width,
                height,
                description,
                ..
            } => {
                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                let rid = rel_id.unwrap_or("rIdImagePlaceholder");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, x: i64, y: i64, width: i64, height: i64) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

/// Write `a:rPr`-like run properties. Child order follows the schema: fill before typeface.
fn write_run_properties(xml: &mut String, format: &TextFormat, tag: &str) -> Result<()> {
    write!(xml, "<{} lang=\"en-US\" dirty=\"0\"", tag)?;

    if let Some(size) = format.size {
        write!(xml, " sz=\"{}\"", crate::common::unit::pt_to_centipoints(size))?;
    }

    if let Some(bold) = format.bold {
        write!(xml, " b=\"{}\"", if bold { 1 } else { 0 })?;
    }

    if format.color.is_none() && format.font.is_none() {
        xml.push_str("/>");
        return Ok(());
    }

    xml.push('>');

    if let Some(ref color) = format.color {
        write!(
            xml,
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            color
        )?;
    }

    if let Some(ref font) = format.font {
        let font = escape_xml(font);
        write!(
            xml,
            "<a:latin typeface=\"{}\"/><a:cs typeface=\"{}\"/>",
            font, font
        )?;
    }

    write!(xml, "</{}>", tag)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_box_xml() {
        let mut shape = MutableShape::new_text_box(3, "Bees".to_string(), 1, 2, 3, 4);
        shape.font("Roboto").font_size(40).bold(true);
        shape.set_frame_format(TextFrameFormat {
            word_wrap: false,
            anchor: VerticalAnchor::Middle,
            align: TextAlign::Center,
        });

        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains(r#"<a:off x="1" y="2"/>"#));
        assert!(xml.contains(r#"<a:ext cx="3" cy="4"/>"#));
        assert!(xml.contains(r#"wrap="none""#));
        assert!(xml.contains(r#"anchor="ctr""#));
        assert!(xml.contains(r#"<a:pPr algn="ctr"/>"#));
        assert!(xml.contains(r#"sz="4000" b="1""#));
        assert!(xml.contains(r#"<a:latin typeface="Roboto"/>"#));
        assert!(xml.contains("<a:t>Bees</a:t>"));
        assert!(xml.contains("<a:noFill/>"));
    }

    #[test]
    fn test_newlines_become_breaks() {
        let shape = MutableShape::new_text_box(3, "one\ntwo".to_string(), 0, 0, 1, 1);
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains("<a:t>one</a:t>"));
        assert!(xml.contains("<a:br>"));
        assert!(xml.contains("<a:t>two</a:t>"));
    }

    #[test]
    fn test_control_characters_are_not_written() {
        let shape =
            MutableShape::new_text_box(3, "Diet\u{0C}: nectar\u{0B}".to_string(), 0, 0, 1, 1);
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains("<a:t>Diet: nectar</a:t>"));
        assert!(!xml.contains('\u{0C}'));
    }

    #[test]
    fn test_solid_fill_on_text_box() {
        let mut shape = MutableShape::new_text_box(3, "x".to_string(), 0, 0, 1, 1);
        shape.set_solid_fill(RgbColor::WHITE).unwrap();
        let mut xml = String::new();
        shape.to_xml(&mut xml, None).unwrap();
        assert!(xml.contains(r#"<a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill>"#));
        assert!(!xml.contains("<a:noFill/>"));
    }

    #[test]
    fn test_solid_fill_on_picture_is_rejected() {
        let mut shape =
            MutableShape::new_picture(4, vec![], ImageFormat::Png, 0, 0, 1, 1, String::new());
        assert!(shape.set_solid_fill(RgbColor::WHITE).is_err());
        assert!(shape.fill_markup().is_none());
    }

    #[test]
    fn test_picture_xml_uses_relationship() {
        let shape = MutableShape::new_picture(
            5,
            vec![1, 2, 3],
            ImageFormat::Png,
            0,
            0,
            100,
            50,
            "hive".to_string(),
        );
        let mut xml = String::new();
        shape.to_xml(&mut xml, Some("rId7")).unwrap();
        assert!(xml.contains(r#"r:embed="rId7""#));
        assert!(xml.contains(r#"descr="hive""#));
        assert_eq!(shape.get_image_data().unwrap().0, &[1, 2, 3]);
    }
}
