//! PowerPoint (.pptx) presentation writing.
//!
//! The writer builds slides out of text boxes and pictures, keeps shape
//! fills as editable markup, and serializes the deck into an OPC package
//! with a single master, a blank layout and a theme.

pub mod format;
pub mod markup;
pub mod template;
pub mod writer;

pub use format::{ImageFormat, RgbColor, TextAlign, TextFormat, TextFrameFormat, VerticalAnchor};
pub use markup::XmlElement;
pub use writer::{MutablePresentation, MutableShape, MutableSlide};
