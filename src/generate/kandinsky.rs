//! Client for a Kandinsky text-to-image service.

use super::{GenerationError, ImageGenerator, decode_base64_image};
use crate::config::KandinskySettings;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ImageRequest<'a> {
    prompt: &'a str,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    image_base64: String,
}

pub struct KandinskyClient {
    http: reqwest::blocking::Client,
    settings: KandinskySettings,
}

impl KandinskyClient {
    pub fn new(settings: KandinskySettings) -> Result<Self, GenerationError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self { http, settings })
    }

    pub fn settings(&self) -> &KandinskySettings {
        &self.settings
    }
}

impl ImageGenerator for KandinskyClient {
    fn generate(
        &self,
        prompt: &str,
        width: u32,
        height: u32,
    ) -> Result<DynamicImage, GenerationError> {
        debug!(url = %self.settings.url, width, height, "requesting image");
        let response = self
            .http
            .post(&self.settings.url)
            .header("Accept", "application/json")
            .json(&ImageRequest {
                prompt,
                width,
                height,
            })
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerationError::ModelUnavailable(format!(
                "image request failed with {}",
                status
            )));
        }

        let body: ImageResponse = response.json()?;
        decode_base64_image(&body.image_base64, width, height)
    }
}
