//! Slide descriptions handed from the pipeline to the builders.

use super::dispatch::{SlideVariant, select_variant};
use crate::media::MediaAsset;
use thiserror::Error;

/// Content of one slide before layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSpec {
    pub title: String,
    pub body_text: Option<String>,
    pub image_asset: Option<MediaAsset>,
    pub background_asset: Option<MediaAsset>,
}

/// Why a [`SlideSpec`] cannot be laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidSlideSpec {
    #[error("title is empty")]
    EmptyTitle,
    #[error("both an image and a background are set")]
    ConflictingAssets,
    #[error("body text has neither an image nor a background")]
    MissingAsset,
    #[error("slide without body text has an inline image")]
    ImageWithoutText,
    #[error("slide without body text has no background")]
    MissingBackground,
}

impl SlideSpec {
    /// The opening slide: a title over a background.
    pub fn title_slide(title: impl Into<String>, background: MediaAsset) -> Self {
        Self {
            title: title.into(),
            body_text: None,
            image_asset: None,
            background_asset: Some(background),
        }
    }

    /// Check the asset invariants and return the variant they select.
    pub fn validate(&self) -> Result<SlideVariant, InvalidSlideSpec> {
        select_variant(self)
    }
}

/// Ordered slides of one presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    pub slides: Vec<SlideSpec>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, slide: SlideSpec) {
        self.slides.push(slide);
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SlideSpec> {
        self.slides.iter()
    }
}
