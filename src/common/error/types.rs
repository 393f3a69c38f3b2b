//! Unified error types for slidewright.
use thiserror::Error;

use crate::compose::fit::FitSearchExhausted;
use crate::config::ConfigError;
use crate::fonts::FontError;
use crate::generate::GenerationError;
use crate::ooxml::error::OoxmlError;

/// Main error type for deck generation.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document model or packaging error
    #[error("Document error: {0}")]
    Document(#[from] OoxmlError),

    /// Font loading error
    #[error("Font error: {0}")]
    Font(#[from] FontError),

    /// Text, image or translation collaborator failed
    #[error("Media acquisition failed: {0}")]
    Generation(#[from] GenerationError),

    /// Raster decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No font size fits and the fallback policy is `Fail`
    #[error(transparent)]
    FitSearchExhausted(#[from] FitSearchExhausted),

    /// The title response produced no usable titles
    #[error("Text model returned no slide titles")]
    NoTitles,

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Result type for slidewright operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert!(Error::NoTitles.to_string().contains("no slide titles"));
        assert!(
            Error::Other("boom".to_string())
                .to_string()
                .contains("boom")
        );
        let io = Error::from(std::io::Error::other("disk"));
        assert!(io.to_string().starts_with("IO error:"));
    }
}
