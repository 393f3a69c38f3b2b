//! Text, image and translation collaborators.
//!
//! The pipeline talks to models only through the [`TextGenerator`],
//! [`ImageGenerator`] and [`Translator`] traits. HTTP clients for a
//! GigaChat-style chat-completion API and a Kandinsky image service are
//! available with the `http` feature.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::DynamicImage;
use image::imageops::FilterType;
use thiserror::Error;

#[cfg(feature = "http")]
pub mod gigachat;
#[cfg(feature = "http")]
pub mod kandinsky;
pub mod prompts;
pub mod translate;

pub use prompts::{Language, PromptConfig};
pub use translate::{IdentityTranslator, LlmTranslator};

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Transport failure, timeout or non-success HTTP status
    #[error("Model unavailable: {0}")]
    ModelUnavailable(String),

    /// The model declined to answer the prompt
    #[error("Model refused to answer")]
    ModelRefused,

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::ModelUnavailable(err.to_string())
    }
}

/// Produces text for a prompt.
pub trait TextGenerator {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Produces a raster of exactly `width` x `height` pixels for a prompt.
pub trait ImageGenerator {
    fn generate(&self, prompt: &str, width: u32, height: u32)
    -> Result<DynamicImage, GenerationError>;
}

/// Translates text into the language with the given ISO 639-1 code.
pub trait Translator {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, GenerationError>;
}

impl<T: TextGenerator + ?Sized> TextGenerator for &T {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }
}

impl<T: ImageGenerator + ?Sized> ImageGenerator for &T {
    fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, GenerationError> {
        (**self).generate(prompt, width, height)
    }
}

impl<T: Translator + ?Sized> Translator for &T {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, GenerationError> {
        (**self).translate(text, target_lang)
    }
}

/// Resize `image` to exactly `width` x `height` if it differs.
pub fn ensure_dimensions(image: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if image.width() == width && image.height() == height {
        image
    } else {
        image.resize_exact(width, height, FilterType::Lanczos3)
    }
}

/// Decode a base64-encoded raster and bring it to the requested size.
pub fn decode_base64_image(
    encoded: &str,
    width: u32,
    height: u32,
) -> Result<DynamicImage, GenerationError> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| GenerationError::InvalidResponse(format!("image is not base64: {}", e)))?;
    let image = image::load_from_memory(&bytes)?;
    Ok(ensure_dimensions(image, width, height))
}
