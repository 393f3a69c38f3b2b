//! Media decisions and generated media assets.
//!
//! Every slide gets exactly one generated picture: an inline image beside
//! the text or a full-bleed background. Slides with body text draw a
//! weighted coin; the title slide always gets a background.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Image size used when no image sizes are configured.
pub const DEFAULT_IMAGE_SIZE: (u32, u32) = (1024, 1024);

/// How a generated picture is placed on its slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaRole {
    /// Placed beside the text at its native aspect ratio
    Image,
    /// Stretched over the whole slide behind the text
    Background,
}

impl MediaRole {
    /// Directory under the run output where assets of this role are stored.
    pub fn dir_name(&self) -> &'static str {
        match self {
            MediaRole::Image => "pictures",
            MediaRole::Background => "backgrounds",
        }
    }
}

/// A generated raster persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub file_path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub role: MediaRole,
}

impl MediaAsset {
    /// Width over height; 1.0 for degenerate sizes.
    pub fn aspect_ratio(&self) -> f64 {
        if self.width == 0 || self.height == 0 {
            1.0
        } else {
            f64::from(self.width) / f64::from(self.height)
        }
    }
}

/// Which kind of picture to request for a slide, and at what size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaDecision {
    pub role: MediaRole,
    pub width: u32,
    pub height: u32,
}

/// Weights and sizes driving [`MediaPolicy::decide`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaPolicy {
    pub image_weight: u32,
    pub background_weight: u32,
    /// Candidate `(width, height)` pixel sizes for inline images
    pub image_sizes: Vec<(u32, u32)>,
    /// `(width, height)` pixel size of backgrounds
    pub background_size: (u32, u32),
}

impl Default for MediaPolicy {
    fn default() -> Self {
        Self {
            image_weight: 4,
            background_weight: 1,
            image_sizes: vec![(768, 1344), (1024, 1024)],
            background_size: (1344, 768),
        }
    }
}

impl MediaPolicy {
    /// Decide the picture for one slide.
    ///
    /// Without body text the result is always a background and `rng` is not
    /// touched.
    pub fn decide<R: Rng + ?Sized>(&self, has_body_text: bool, rng: &mut R) -> MediaDecision {
        if has_body_text && self.draw_image(rng) {
            let (width, height) = self
                .image_sizes
                .choose(rng)
                .copied()
                .unwrap_or(DEFAULT_IMAGE_SIZE);
            MediaDecision {
                role: MediaRole::Image,
                width,
                height,
            }
        } else {
            let (width, height) = self.background_size;
            MediaDecision {
                role: MediaRole::Background,
                width,
                height,
            }
        }
    }

    fn draw_image<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        let total = self.image_weight.saturating_add(self.background_weight);
        if total == 0 {
            return false;
        }
        rng.random_ratio(self.image_weight.min(total), total)
    }
}
