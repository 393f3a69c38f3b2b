//! Command-line entry point: generate a presentation from a description.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use slidewright::config::Config;
use slidewright::fonts::{FontFamily, FontLoader, RustTypeMetrics};
use slidewright::generate::gigachat::{GigaChatClient, GigaChatCredentials};
use slidewright::generate::kandinsky::KandinskyClient;
use slidewright::generate::{Language, LlmTranslator, PromptConfig};
use slidewright::pipeline::ContentPipeline;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "slidewright", version, about = "Generate a slide deck from a short description")]
struct Args {
    /// What the presentation is about
    #[arg(short, long)]
    description: String,

    /// Language of the generated text
    #[arg(short, long, value_enum, default_value = "en")]
    language: Language,

    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory with one subdirectory per font family
    #[arg(long)]
    fonts_dir: Option<PathBuf>,

    /// Where pictures and the presentation are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seed for media, style and font choices
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn choose_font(fonts_dir: &Path, rng: &mut StdRng) -> Result<FontFamily> {
    let loader = FontLoader::new(fonts_dir);
    match loader.choose(rng) {
        Ok(family) => Ok(family),
        #[cfg(feature = "system-fonts")]
        Err(err) => {
            tracing::warn!(%err, "no usable font directory, asking the system");
            slidewright::fonts::loader::load_system_family("Arial")
                .context("no font family found on the system")
        },
        #[cfg(not(feature = "system-fonts"))]
        Err(err) => Err(err).with_context(|| {
            format!("no font family found in {}", fonts_dir.display())
        }),
    }
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(fonts_dir) = args.fonts_dir {
        config.fonts_dir = fonts_dir;
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let family = choose_font(&config.fonts_dir, &mut rng)?;
    info!(family = %family.name, "using font family");
    let metrics = RustTypeMetrics::from_family(&family)
        .with_context(|| format!("failed to load font family {}", family.name))?;

    let credentials = GigaChatCredentials::from_env()?;
    let text = GigaChatClient::new(config.gigachat.clone(), credentials)?;
    let images = KandinskyClient::new(config.kandinsky.clone())?;
    let translator = LlmTranslator::new(&text);

    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.logs_dir.join(Utc::now().timestamp().to_string()));

    let mut pipeline = ContentPipeline::new(
        &config,
        PromptConfig::for_language(args.language),
        &text,
        images,
        translator,
        metrics,
        rng,
    );
    let result = pipeline
        .run(&args.description, &output_dir)
        .context("presentation generation failed")?;

    info!(
        slides = result.deck.len() - result.rejected.len(),
        path = %result.presentation_path.display(),
        "done"
    );
    println!("{}", result.presentation_path.display());
    Ok(())
}
