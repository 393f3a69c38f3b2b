/// Presentation writer for PPTX.
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{ContentTypesItem, PackageWriter};
use crate::ooxml::pptx::template;
use chrono::Utc;
use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::relmap::RelationshipMapper;
use super::slide::MutableSlide;

/// A mutable PowerPoint presentation for writing.
///
/// Provides methods to add slides, set dimensions, and serialize the whole
/// deck into a `.pptx` package.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    /// Title written to the core properties
    title: String,
    /// Whether the presentation has been modified
    modified: bool,
}

impl MutablePresentation {
    /// Create a new empty presentation with default dimensions.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: 9144000,  // 10 inches
            slide_height: 6858000, // 7.5 inches
            title: String::new(),
            modified: false,
        }
    }

    /// Add a new blank slide to the presentation.
    pub fn add_slide(&mut self) -> &mut MutableSlide {
        let slide_id = (self.slides.len() + 256) as u32;
        self.slides.push(MutableSlide::new(slide_id));
        self.modified = true;
        let index = self.slides.len() - 1;
        &mut self.slides[index]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get a mutable reference to a slide by index (0-based).
    pub fn slide_mut(&mut self, index: usize) -> Option<&mut MutableSlide> {
        self.slides.get_mut(index)
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Set the slide width in EMUs.
    pub fn set_slide_width(&mut self, width: i64) {
        self.slide_width = width;
        self.modified = true;
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the slide height in EMUs.
    pub fn set_slide_height(&mut self, height: i64) {
        self.slide_height = height;
        self.modified = true;
    }

    /// Set the document title stored in the core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.modified = true;
    }

    /// Check if the presentation has been modified.
    pub fn is_modified(&self) -> bool {
        self.modified || self.slides.iter().any(|s| s.is_modified())
    }

    /// Generate presentation.xml content with actual relationship IDs.
    ///
    /// # Arguments
    /// * `slide_rel_ids` - Relationship IDs of the slides, in slide order
    pub(crate) fn generate_presentation_xml_with_rels(
        &self,
        slide_rel_ids: &[String],
    ) -> Result<String> {
        if slide_rel_ids.len() != self.slides.len() {
            return Err(OoxmlError::InvalidRelationship(format!(
                "{} slide relationship IDs for {} slides",
                slide_rel_ids.len(),
                self.slides.len()
            )));
        }

        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        // Write slide master ID list
        xml.push_str("<p:sldMasterIdLst>");
        xml.push_str(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#);
        xml.push_str("</p:sldMasterIdLst>");

        // Write slide ID list
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;

        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Serialize the presentation into `.pptx` package bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = PackageWriter::new();
        let mut content_types = ContentTypesItem::new();
        let mut rel_mapper = RelationshipMapper::new();

        // Media parts are numbered across the whole package
        let mut media_counter = 0usize;
        let mut slide_rels = Vec::with_capacity(self.slides.len());
        for (slide_index, slide) in self.slides.iter().enumerate() {
            let mut rels = vec![(
                "rId1".to_string(),
                rt::SLIDE_LAYOUT,
                "../slideLayouts/slideLayout1.xml".to_string(),
            )];
            for (image_index, (data, format)) in slide.collect_images().into_iter().enumerate() {
                media_counter += 1;
                let ext = format.extension();
                let member = format!("ppt/media/image{}.{}", media_counter, ext);
                writer.write(&member, data)?;
                content_types.add_default(ext, format.mime_type());

                let rel_id = format!("rId{}", rels.len() + 1);
                rel_mapper.add_image(slide_index, image_index, rel_id.clone());
                rels.push((
                    rel_id,
                    rt::IMAGE,
                    format!("../media/image{}.{}", media_counter, ext),
                ));
            }
            slide_rels.push(rels);
        }

        let mut slide_rel_ids = Vec::with_capacity(self.slides.len());
        let mut pres_rels: Vec<(String, &str, String)> = vec![(
            "rId1".to_string(),
            rt::SLIDE_MASTER,
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for (slide_index, (slide, rels)) in self.slides.iter().zip(&slide_rels).enumerate() {
            let number = slide_index + 1;
            let xml = slide.to_xml_with_rels(Some(slide_index), Some(&rel_mapper))?;
            writer.write(&format!("ppt/slides/slide{}.xml", number), xml.as_bytes())?;
            writer.write(
                &format!("ppt/slides/_rels/slide{}.xml.rels", number),
                rels_to_xml(rels).as_bytes(),
            )?;
            content_types.add_override(&format!("/ppt/slides/slide{}.xml", number), ct::PML_SLIDE);

            let rel_id = format!("rId{}", pres_rels.len() + 1);
            slide_rel_ids.push(rel_id.clone());
            pres_rels.push((rel_id, rt::SLIDE, format!("slides/slide{}.xml", number)));
        }
        pres_rels.push((
            format!("rId{}", pres_rels.len() + 1),
            rt::THEME,
            "theme/theme1.xml".to_string(),
        ));

        let presentation_xml = self.generate_presentation_xml_with_rels(&slide_rel_ids)?;
        writer.write("ppt/presentation.xml", presentation_xml.as_bytes())?;
        writer.write(
            "ppt/_rels/presentation.xml.rels",
            rels_to_xml(&pres_rels).as_bytes(),
        )?;

        writer.write(
            "ppt/slideMasters/slideMaster1.xml",
            template::default_slide_master_xml().as_bytes(),
        )?;
        writer.write(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            template::default_slide_master_rels_xml().as_bytes(),
        )?;
        writer.write(
            "ppt/slideLayouts/slideLayout1.xml",
            template::slide_layout_blank_xml().as_bytes(),
        )?;
        writer.write(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            template::slide_layout_blank_rels_xml().as_bytes(),
        )?;
        writer.write(
            "ppt/theme/theme1.xml",
            template::default_theme_xml().as_bytes(),
        )?;
        writer.write(
            "docProps/core.xml",
            template::core_props_xml(&self.title, Utc::now()).as_bytes(),
        )?;
        writer.write(
            "docProps/app.xml",
            template::app_props_xml(self.slides.len()).as_bytes(),
        )?;
        writer.write(
            "_rels/.rels",
            template::relationships_xml(&[
                ("rId1", rt::OFFICE_DOCUMENT, "ppt/presentation.xml"),
                ("rId2", rt::CORE_PROPERTIES, "docProps/core.xml"),
                ("rId3", rt::EXTENDED_PROPERTIES, "docProps/app.xml"),
            ])
            .as_bytes(),
        )?;

        content_types.add_override("/ppt/presentation.xml", ct::PML_PRESENTATION_MAIN);
        content_types.add_override("/ppt/slideMasters/slideMaster1.xml", ct::PML_SLIDE_MASTER);
        content_types.add_override("/ppt/slideLayouts/slideLayout1.xml", ct::PML_SLIDE_LAYOUT);
        content_types.add_override("/ppt/theme/theme1.xml", ct::OFC_THEME);
        content_types.add_override("/docProps/core.xml", ct::OPC_CORE_PROPERTIES);
        content_types.add_override("/docProps/app.xml", ct::OFC_EXTENDED_PROPERTIES);
        writer.write(
            crate::ooxml::opc::pkgwriter::CONTENT_TYPES_URI,
            content_types.to_xml().as_bytes(),
        )?;

        writer.finish()
    }

    /// Write the presentation to a `.pptx` file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

fn rels_to_xml(rels: &[(String, &str, String)]) -> String {
    let borrowed: Vec<(&str, &str, &str)> = rels
        .iter()
        .map(|(id, rel_type, target)| (id.as_str(), *rel_type, target.as_str()))
        .collect();
    template::relationships_xml(&borrowed)
}
