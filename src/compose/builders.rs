//! Slide builders, one per layout variant.
//!
//! Font sizes are fitted and pictures loaded before the slide is created,
//! so a failed search or an unreadable asset never leaves a half-built
//! slide behind. Every builder appends exactly one slide.

use super::canvas::{CANVAS, Canvas, LayoutBox};
use super::dispatch::SlideVariant;
use super::fit::{TextFitEngine, body_ceiling};
use super::transparency::apply_translucent_fill;
use super::CompositionSettings;
use crate::common::error::Result;
use crate::fonts::FontMetrics;
use crate::media::MediaAsset;
use crate::ooxml::OoxmlError;
use crate::ooxml::pptx::{
    ImageFormat, MutablePresentation, MutableSlide, RgbColor, TextAlign, TextFrameFormat,
    VerticalAnchor,
};
use tracing::debug;

/// What a builder produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltSlide {
    pub variant: SlideVariant,
    pub title_size: u32,
    pub body_size: Option<u32>,
}

/// Lays out slides with one font family on a fixed canvas.
#[derive(Debug, Clone)]
pub struct SlideBuilder<M> {
    canvas: Canvas,
    fit: TextFitEngine<M>,
    settings: CompositionSettings,
}

impl<M: FontMetrics> SlideBuilder<M> {
    pub fn new(metrics: M, settings: CompositionSettings) -> Self {
        Self {
            canvas: CANVAS,
            fit: TextFitEngine::new(metrics, settings.fit_fallback),
            settings,
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn settings(&self) -> &CompositionSettings {
        &self.settings
    }

    /// Title over a full-bleed background.
    pub fn build_title_slide(
        &self,
        presentation: &mut MutablePresentation,
        title: &str,
        background: &MediaAsset,
    ) -> Result<BuiltSlide> {
        let title_box = self.canvas.title_only_box();
        let title_size = self.fit_title(title, &title_box)?;
        let picture = LoadedPicture::read(background)?;

        let slide = presentation.add_slide();
        self.add_text(slide, title, &title_box, title_size, true)?;
        let index = picture.place(slide, &self.canvas.full_bleed())?;
        slide.send_to_back(index)?;

        Ok(BuiltSlide {
            variant: SlideVariant::TitleSlide,
            title_size,
            body_size: None,
        })
    }

    /// Title and body text over a full-bleed background.
    pub fn build_text_on_background(
        &self,
        presentation: &mut MutablePresentation,
        title: &str,
        body: &str,
        background: &MediaAsset,
    ) -> Result<BuiltSlide> {
        let title_box = self.canvas.title_box();
        let body_box = self.canvas.body_box();
        let (title_size, body_size) = self.fit_title_and_body(title, &title_box, body, &body_box)?;
        let picture = LoadedPicture::read(background)?;

        let slide = presentation.add_slide();
        picture.place(slide, &self.canvas.full_bleed())?;
        self.add_text(slide, title, &title_box, title_size, true)?;
        self.add_text(slide, body, &body_box, body_size, false)?;

        Ok(BuiltSlide {
            variant: SlideVariant::TextOnBackground,
            title_size,
            body_size: Some(body_size),
        })
    }

    /// Title on top, body text on the left and the image on the right.
    pub fn build_text_beside_image(
        &self,
        presentation: &mut MutablePresentation,
        title: &str,
        body: &str,
        image: &MediaAsset,
    ) -> Result<BuiltSlide> {
        let layout = self.canvas.beside_image(image.aspect_ratio());
        let (title_size, body_size) =
            self.fit_title_and_body(title, &layout.title, body, &layout.body)?;
        let picture = LoadedPicture::read(image)?;

        let slide = presentation.add_slide();
        self.add_text(slide, title, &layout.title, title_size, true)?;
        self.add_text(slide, body, &layout.body, body_size, false)?;
        picture.place(slide, &layout.image)?;

        Ok(BuiltSlide {
            variant: SlideVariant::TextBesideImage,
            title_size,
            body_size: Some(body_size),
        })
    }

    fn fit_title(&self, title: &str, layout: &LayoutBox) -> Result<u32> {
        let size = self
            .fit
            .fit_with_fallback(title, layout, self.settings.title_max_font_size, true)?;
        debug!(size, "fitted title");
        Ok(size)
    }

    fn fit_title_and_body(
        &self,
        title: &str,
        title_box: &LayoutBox,
        body: &str,
        body_box: &LayoutBox,
    ) -> Result<(u32, u32)> {
        let title_size = self.fit_title(title, title_box)?;
        let ceiling = body_ceiling(title_size, self.settings.body_font_coefficient);
        let body_size = self.fit.fit_with_fallback(body, body_box, ceiling, false)?;
        debug!(title_size, ceiling, body_size, "fitted body");
        Ok((title_size, body_size))
    }

    fn add_text(
        &self,
        slide: &mut MutableSlide,
        text: &str,
        layout: &LayoutBox,
        size: u32,
        bold: bool,
    ) -> Result<()> {
        let (x, y, cx, cy) = layout.to_emu();
        let shape = slide.add_text_box(text, x, y, cx, cy);
        shape.set_frame_format(TextFrameFormat {
            word_wrap: false,
            anchor: VerticalAnchor::Middle,
            align: TextAlign::Center,
        });
        shape
            .font(self.fit.metrics().family_name())
            .font_size(size)
            .bold(bold);
        apply_translucent_fill(shape, RgbColor::WHITE, self.settings.overlay_alpha)?;
        Ok(())
    }
}

/// Picture bytes read and sniffed ahead of slide creation.
struct LoadedPicture {
    data: Vec<u8>,
    description: String,
}

impl LoadedPicture {
    fn read(asset: &MediaAsset) -> Result<Self> {
        let data = std::fs::read(&asset.file_path)?;
        if ImageFormat::detect_from_bytes(&data).is_none() {
            return Err(OoxmlError::InvalidFormat(format!(
                "{} is not a supported image",
                asset.file_path.display()
            ))
            .into());
        }
        let description = asset
            .file_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Picture".to_string());
        Ok(Self { data, description })
    }

    /// Add the picture to `slide` over `layout` and return its shape index.
    fn place(self, slide: &mut MutableSlide, layout: &LayoutBox) -> Result<usize> {
        let (x, y, cx, cy) = layout.to_emu();
        let index =
            slide.add_picture_from_bytes(self.data, x, y, cx, cy, Some(self.description))?;
        Ok(index)
    }
}
