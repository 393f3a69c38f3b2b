//! Slide composition.
//!
//! Given a [`SlideSpec`], the dispatcher picks one of three layouts and the
//! matching builder places text and pictures on the 16x9 canvas, sizing
//! every text run with the [`TextFitEngine`] and giving text boxes a
//! translucent white backing.

pub mod builders;
pub mod canvas;
pub mod deck;
pub mod dispatch;
pub mod fit;
pub mod transparency;

pub use builders::{BuiltSlide, SlideBuilder};
pub use canvas::{CANVAS, Canvas, LayoutBox};
pub use deck::{Deck, InvalidSlideSpec, SlideSpec};
pub use dispatch::{DispatchOutcome, SlideVariant, dispatch, select_variant};
pub use fit::{FitFallback, FitSearchExhausted, Probe, TextFitEngine};
pub use transparency::apply_translucent_fill;

use serde::{Deserialize, Serialize};

/// Typography and overlay settings shared by all builders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionSettings {
    /// Ceiling of the title font size search, in points
    pub title_max_font_size: u32,
    /// Body ceiling as a fraction of the fitted title size
    pub body_font_coefficient: f64,
    pub fit_fallback: FitFallback,
    /// Transparency of the white text backing, 0 opaque to 1 invisible
    pub overlay_alpha: f64,
}

impl Default for CompositionSettings {
    fn default() -> Self {
        Self {
            title_max_font_size: 80,
            body_font_coefficient: 0.6,
            fit_fallback: FitFallback::MinimumSize,
            overlay_alpha: 0.5,
        }
    }
}
