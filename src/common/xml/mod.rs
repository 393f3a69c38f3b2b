//! XML text helpers.

mod escape;

pub use escape::escape_xml;
