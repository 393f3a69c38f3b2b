//! Prompt translation.
//!
//! Image models understand English best, so prompts written in the deck
//! language are translated before image generation.

use super::{GenerationError, TextGenerator, Translator};
use tracing::debug;

/// Returns the text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _target_lang: &str) -> Result<String, GenerationError> {
        Ok(text.to_string())
    }
}

/// Translates by asking a text model.
#[derive(Debug, Clone)]
pub struct LlmTranslator<G> {
    generator: G,
}

impl<G: TextGenerator> LlmTranslator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }
}

fn language_name(code: &str) -> &str {
    match code {
        "en" => "English",
        "ru" => "Russian",
        other => other,
    }
}

impl<G: TextGenerator> Translator for LlmTranslator<G> {
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, GenerationError> {
        let text = text.trim();
        // ASCII text is already English
        if text.is_empty() || (target_lang == "en" && text.is_ascii()) {
            return Ok(text.to_string());
        }

        let prompt = format!(
            "Translate the following text to {}. Reply with the translation only.\n\n{}",
            language_name(target_lang),
            text
        );
        let translated = self.generator.generate(&prompt)?;
        let translated = translated
            .trim()
            .trim_matches(|c: char| c == '"' || c == '«' || c == '»')
            .trim();
        if translated.is_empty() {
            return Err(GenerationError::InvalidResponse(
                "empty translation".to_string(),
            ));
        }
        debug!(target_lang, "translated prompt");
        Ok(translated.to_string())
    }
}
