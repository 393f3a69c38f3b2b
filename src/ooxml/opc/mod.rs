//! Open Packaging Convention (OPC) support for writing packages.
//!
//! An OPC package is a ZIP container of parts, each with a content type,
//! tied together by relationship parts.

pub mod constants;
pub mod pkgwriter;

pub use pkgwriter::{ContentTypesItem, PackageWriter};
