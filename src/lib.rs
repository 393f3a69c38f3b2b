//! Slidewright - adaptive slide composition for generated presentations
//!
//! This library assembles `.pptx` decks from model-generated text and
//! imagery. For every slide it picks a layout, places text and pictures on a
//! fixed 16x9 inch canvas, searches for the largest font size that keeps the
//! text inside its box and backs the text with a translucent white overlay.
//!
//! # Features
//!
//! - **Layout selection**: title slides, text over a background and text
//!   beside an image, chosen from the content of each slide
//! - **Text fitting**: descending font size search against real glyph metrics
//! - **PPTX writing**: a small mutable presentation model serialized as an
//!   OPC package
//! - **Model clients**: GigaChat text and Kandinsky image services
//!   (`http` feature)
//!
//! # Example - Laying out a deck
//!
//! ```no_run
//! use slidewright::compose::{CompositionSettings, SlideBuilder, SlideSpec, dispatch};
//! use slidewright::fonts::{FontLoader, RustTypeMetrics};
//! use slidewright::media::{MediaAsset, MediaRole};
//! use slidewright::ooxml::pptx::MutablePresentation;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let family = FontLoader::new("fonts").choose(&mut rand::rng())?;
//! let builder = SlideBuilder::new(
//!     RustTypeMetrics::from_family(&family)?,
//!     CompositionSettings::default(),
//! );
//!
//! let background = MediaAsset {
//!     file_path: "backgrounds/000000.png".into(),
//!     width: 1344,
//!     height: 768,
//!     role: MediaRole::Background,
//! };
//! let mut presentation = MutablePresentation::new();
//! dispatch(&builder, &mut presentation, &SlideSpec::title_slide("Bees", background))?;
//! presentation.save("presentation.pptx")?;
//! # Ok(())
//! # }
//! ```

/// Shared error, unit and XML helpers
pub mod common;

/// Canvas geometry, font fitting, slide builders and layout dispatch
pub mod compose;

/// YAML configuration
pub mod config;

/// Font discovery and text measurement
pub mod fonts;

/// Text, image and translation collaborators
pub mod generate;

/// Media decisions and generated assets
pub mod media;

/// OOXML presentation writing
///
/// A mutable presentation model and the OPC package writer behind it.
pub mod ooxml;

/// End-to-end deck generation
pub mod pipeline;

pub use common::error::{Error, Result};
pub use compose::{Deck, DispatchOutcome, SlideSpec, SlideVariant};
pub use config::Config;
pub use pipeline::{ContentPipeline, PipelineResult};
