/// Slide types and implementation for PPTX presentations.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use std::path::Path;

// Import shared format types
use super::super::format::ImageFormat;
use super::shape::MutableShape;

/// A mutable slide in a presentation.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier)
    pub(crate) slide_id: u32,
    /// Shapes on the slide, bottom-most first
    pub(crate) shapes: Vec<MutableShape>,
    /// Whether the slide has been modified
    pub(crate) modified: bool,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            shapes: Vec::new(),
            modified: false,
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    // IDs: 1=group, 2+=shapes. IDs stay stable when the z-order changes.
    fn next_shape_id(&self) -> u32 {
        self.shapes
            .iter()
            .map(|s| s.shape_id)
            .max()
            .map_or(2, |max| max + 1)
    }

    /// Add a text box to the slide and return it for further formatting.
    pub fn add_text_box(
        &mut self,
        text: &str,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let shape = MutableShape::new_text_box(shape_id, text.to_string(), x, y, width, height);
        self.shapes.push(shape);
        self.modified = true;
        let index = self.shapes.len() - 1;
        &mut self.shapes[index]
    }

    /// Add a picture to the slide from a file.
    ///
    /// Returns the index of the new shape in the shape tree.
    pub fn add_picture<P: AsRef<Path>>(
        &mut self,
        image_path: P,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Result<usize> {
        let image_path = image_path.as_ref();
        let data = std::fs::read(image_path)?;
        let description = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Picture".to_string());
        self.add_picture_from_bytes(data, x, y, width, height, Some(description))
    }

    /// Add a picture to the slide from bytes.
    ///
    /// Returns the index of the new shape in the shape tree.
    pub fn add_picture_from_bytes(
        &mut self,
        data: Vec<u8>,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        description: Option<String>,
    ) -> Result<usize> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidFormat("Unknown image format".to_string()))?;

        let shape_id = self.next_shape_id();
        let desc = description.unwrap_or_else(|| "Picture".to_string());
        let shape = MutableShape::new_picture(shape_id, data, format, x, y, width, height, desc);
        self.shapes.push(shape);
        self.modified = true;

        Ok(self.shapes.len() - 1)
    }

    /// Move the shape at `index` to the bottom of the shape tree, directly above
    /// the group properties, so that it renders behind every other shape.
    pub fn send_to_back(&mut self, index: usize) -> Result<()> {
        if index >= self.shapes.len() {
            return Err(OoxmlError::Other(format!(
                "shape index {} out of range ({} shapes)",
                index,
                self.shapes.len()
            )));
        }
        let shape = self.shapes.remove(index);
        self.shapes.insert(0, shape);
        self.modified = true;
        Ok(())
    }

    /// Get the number of shapes on the slide.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Shapes in z-order, bottom-most first.
    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    /// Get a mutable reference to a shape by z-order index.
    pub fn shape_mut(&mut self, index: usize) -> Option<&mut MutableShape> {
        self.modified = true;
        self.shapes.get_mut(index)
    }

    /// Check if the slide has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Collect all images from this slide in z-order.
    pub(crate) fn collect_images(&self) -> Vec<(&[u8], ImageFormat)> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.get_image_data())
            .collect()
    }

    /// Generate slide XML content without resolved relationships.
    #[cfg(test)]
    pub(crate) fn to_xml(&self) -> Result<String> {
        self.to_xml_with_rels(None, None)
    }

    /// Generate slide XML content with relationship IDs from the mapper.
    ///
    /// # Arguments
    /// * `slide_index` - The index of this slide (used to look up relationships)
    /// * `rel_mapper` - The relationship mapper containing actual relationship IDs
    pub(crate) fn to_xml_with_rels(
        &self,
        slide_index: Option<usize>,
        rel_mapper: Option<&RelationshipMapper>,
    ) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);

        xml.push_str(
            r#"<p:sld xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" "#,
        );
        xml.push_str(r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#);
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
        );

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Write group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        // Write shapes with relationship IDs
        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = if shape.is_picture() {
                let rid = slide_index
                    .and_then(|si| rel_mapper.and_then(|rm| rm.get_image_id(si, image_counter)));
                image_counter += 1;
                rid
            } else {
                None
            };

            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");

        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_shape_ids_are_unique_after_reorder() {
        let mut slide = MutableSlide::new(256);
        slide.add_text_box("Title", 0, 0, 10, 10);
        let pic = slide
            .add_picture_from_bytes(PNG_MAGIC.to_vec(), 0, 0, 10, 10, None)
            .unwrap();
        slide.send_to_back(pic).unwrap();
        slide.add_text_box("Body", 0, 0, 10, 10);

        let ids: Vec<u32> = slide.shapes().iter().map(|s| s.shape_id()).collect();
        assert_eq!(ids, vec![3, 2, 4]);
    }

    #[test]
    fn test_send_to_back_puts_picture_first() {
        let mut slide = MutableSlide::new(256);
        slide.add_text_box("Title", 0, 0, 10, 10);
        let pic = slide
            .add_picture_from_bytes(PNG_MAGIC.to_vec(), 0, 0, 10, 10, None)
            .unwrap();
        assert_eq!(pic, 1);
        slide.send_to_back(pic).unwrap();
        assert!(slide.shapes()[0].is_picture());

        let xml = slide.to_xml().unwrap();
        let pic_pos = xml.find("<p:pic>").unwrap();
        let sp_pos = xml.find("<p:sp>").unwrap();
        assert!(pic_pos < sp_pos);
    }

    #[test]
    fn test_send_to_back_out_of_range() {
        let mut slide = MutableSlide::new(256);
        assert!(slide.send_to_back(0).is_err());
    }

    #[test]
    fn test_add_picture_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("000002.png");
        std::fs::write(&path, PNG_MAGIC).unwrap();
        let mut slide = MutableSlide::new(256);
        assert_eq!(slide.add_picture(&path, 0, 0, 10, 10).unwrap(), 0);
        assert!(slide.shapes()[0].is_picture());
        assert!(slide.add_picture(dir.path().join("missing.png"), 0, 0, 1, 1).is_err());
        assert_eq!(slide.shape_count(), 1);
    }

    #[test]
    fn test_unknown_image_bytes_rejected() {
        let mut slide = MutableSlide::new(256);
        let result = slide.add_picture_from_bytes(vec![0, 0, 0, 0], 0, 0, 1, 1, None);
        assert!(result.is_err());
        assert_eq!(slide.shape_count(), 0);
    }
}
