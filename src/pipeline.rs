//! End-to-end deck generation.
//!
//! [`ContentPipeline::run`] asks the text model for slide titles and bodies,
//! acquires one picture per slide, lays the slides out and writes
//! `presentation.pptx` into the output directory:
//!
//! ```text
//! <output>/
//!   pictures/000003.png
//!   backgrounds/000000.png
//!   presentation.pptx
//! ```

use crate::common::error::{Error, Result};
use crate::common::unit::inches_to_emu;
use crate::compose::{
    Deck, DispatchOutcome, InvalidSlideSpec, SlideBuilder, SlideSpec, dispatch,
};
use crate::config::Config;
use crate::fonts::FontMetrics;
use crate::generate::prompts::background_prompt;
use crate::generate::{
    ImageGenerator, PromptConfig, TextGenerator, Translator, ensure_dimensions,
};
use crate::media::{MediaAsset, MediaDecision, MediaPolicy, MediaRole};
use crate::ooxml::pptx::MutablePresentation;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the written deck inside the output directory.
pub const PRESENTATION_FILE_NAME: &str = "presentation.pptx";

/// Language all image prompts are translated into.
const IMAGE_PROMPT_LANGUAGE: &str = "en";

/// What a run produced.
#[derive(Debug)]
pub struct PipelineResult {
    pub deck: Deck,
    pub presentation_path: PathBuf,
    /// Slide indices that were dropped, with the reason
    pub rejected: Vec<(usize, InvalidSlideSpec)>,
}

/// Drives the collaborators and builders for one presentation at a time.
pub struct ContentPipeline<T, I, Tr, M> {
    text: T,
    images: I,
    translator: Tr,
    builder: SlideBuilder<M>,
    media: MediaPolicy,
    prompts: PromptConfig,
    rng: StdRng,
}

impl<T, I, Tr, M> ContentPipeline<T, I, Tr, M>
where
    T: TextGenerator,
    I: ImageGenerator,
    Tr: Translator,
    M: FontMetrics,
{
    pub fn new(
        config: &Config,
        prompts: PromptConfig,
        text: T,
        images: I,
        translator: Tr,
        metrics: M,
        rng: StdRng,
    ) -> Self {
        Self {
            text,
            images,
            translator,
            builder: SlideBuilder::new(metrics, config.composition.clone()),
            media: config.media.clone(),
            prompts,
            rng,
        }
    }

    pub fn prompts(&self) -> &PromptConfig {
        &self.prompts
    }

    /// Generate a deck for `description` into `output_dir`.
    ///
    /// Collaborator failures abort the run; pictures already written stay on
    /// disk. Slides whose content is inconsistent are skipped and reported
    /// in [`PipelineResult::rejected`].
    pub fn run(&mut self, description: &str, output_dir: &Path) -> Result<PipelineResult> {
        for role in [MediaRole::Image, MediaRole::Background] {
            fs::create_dir_all(output_dir.join(role.dir_name()))?;
        }

        let titles = self.generate_titles(description)?;
        info!(count = titles.len(), "generated slide titles");

        let texts = self.generate_texts(description, &titles)?;
        info!(count = texts.iter().flatten().count(), "generated slide texts");

        let style = self
            .prompts
            .background_styles
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_default();
        debug!(style = %style, "background style for this run");

        let mut deck = Deck::new();
        for (index, (title, body_text)) in titles.iter().zip(texts).enumerate() {
            let decision = self.media.decide(body_text.is_some(), &mut self.rng);
            let asset = self.acquire_media(index, description, title, &style, decision, output_dir)?;
            let (image_asset, background_asset) = match asset.role {
                MediaRole::Image => (Some(asset), None),
                MediaRole::Background => (None, Some(asset)),
            };
            let spec = SlideSpec {
                title: title.clone(),
                body_text,
                image_asset,
                background_asset,
            };
            if let Err(reason) = spec.validate() {
                warn!(index, %reason, "slide content is inconsistent");
            }
            deck.push(spec);
        }
        info!(slides = deck.len(), "acquired slide media");

        let mut presentation = MutablePresentation::new();
        let canvas = *self.builder.canvas();
        presentation.set_slide_width(inches_to_emu(canvas.width));
        presentation.set_slide_height(inches_to_emu(canvas.height));
        presentation.set_title(titles[0].as_str());

        let mut rejected = Vec::new();
        for (index, spec) in deck.iter().enumerate() {
            match dispatch(&self.builder, &mut presentation, spec)? {
                DispatchOutcome::Built(built) => debug!(
                    index,
                    variant = %built.variant,
                    title_size = built.title_size,
                    body_size = ?built.body_size,
                    "built slide"
                ),
                DispatchOutcome::Rejected(reason) => {
                    warn!(index, %reason, "slide rejected");
                    rejected.push((index, reason));
                },
            }
        }
        info!(
            built = presentation.slide_count(),
            rejected = rejected.len(),
            "laid out slides"
        );

        let presentation_path = output_dir.join(PRESENTATION_FILE_NAME);
        presentation.save(&presentation_path)?;
        info!(path = %presentation_path.display(), "saved presentation");

        Ok(PipelineResult {
            deck,
            presentation_path,
            rejected,
        })
    }

    fn generate_titles(&self, description: &str) -> Result<Vec<String>> {
        let response = self.text.generate(&self.prompts.title_query(description))?;
        let titles = self.prompts.parse_titles(&response);
        if titles.is_empty() {
            return Err(Error::NoTitles);
        }
        Ok(titles)
    }

    /// Body text per title; the first slide never has one.
    fn generate_texts(&self, description: &str, titles: &[String]) -> Result<Vec<Option<String>>> {
        let mut texts = Vec::with_capacity(titles.len());
        texts.push(None);
        for title in &titles[1..] {
            let response = self.text.generate(&self.prompts.text_query(description, title))?;
            let text = self.prompts.clean_answer(&response);
            if text.is_empty() {
                warn!(title = %title, "empty slide text");
                texts.push(None);
            } else {
                texts.push(Some(text));
            }
        }
        Ok(texts)
    }

    fn acquire_media(
        &self,
        index: usize,
        description: &str,
        title: &str,
        style: &str,
        decision: MediaDecision,
        output_dir: &Path,
    ) -> Result<MediaAsset> {
        let prompt = match decision.role {
            MediaRole::Image => {
                let response = self.text.generate(&self.prompts.image_query(description, title))?;
                self.prompts.clean_answer(&response)
            },
            MediaRole::Background => {
                let response = self
                    .text
                    .generate(&self.prompts.background_query(description, title))?;
                background_prompt(&self.prompts.clean_answer(&response), style)
            },
        };
        let prompt = self.translator.translate(&prompt, IMAGE_PROMPT_LANGUAGE)?;
        debug!(index, role = ?decision.role, prompt = %prompt, "requesting picture");

        let image = self
            .images
            .generate(&prompt, decision.width, decision.height)?;
        let image = ensure_dimensions(image, decision.width, decision.height);
        let file_path = output_dir
            .join(decision.role.dir_name())
            .join(format!("{:06}.png", index));
        image.save(&file_path)?;

        Ok(MediaAsset {
            file_path,
            width: decision.width,
            height: decision.height,
            role: decision.role,
        })
    }
}
