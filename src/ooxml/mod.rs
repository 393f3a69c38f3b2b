//! Office Open XML (OOXML) output.
//!
//! Only the presentation format is produced; the package layer is shared so
//! that parts, relationships and content types stay consistent.

pub mod error;
pub mod opc;
pub mod pptx;

pub use error::{OoxmlError, Result};
pub use pptx::{MutablePresentation, MutableShape, MutableSlide};
