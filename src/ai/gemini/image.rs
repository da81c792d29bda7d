use super::client::GeminiHttpClient;
use super::types::{PredictInstance, PredictParameters, PredictRequest, PredictResponse};
use crate::ai::ImageGenerationService;
use crate::models::{AspectRatio, ImageLocator};
use crate::{Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

const OUTPUT_MIME_TYPE: &str = "image/jpeg";

/// Imagen-backed image generation.
pub struct GeminiImageClient {
    http: GeminiHttpClient,
    image_count: u32,
}

impl GeminiImageClient {
    pub fn new(api_key: String, model: String, image_count: u32) -> Self {
        Self::new_with_client(api_key, model, image_count, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        image_count: u32,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(
                api_key,
                model,
                Duration::from_secs(120),
                client,
            ),
            image_count,
        }
    }
}

#[cfg(test)]
super::impl_with_gemini_base_url!(GeminiImageClient);

#[async_trait]
impl ImageGenerationService for GeminiImageClient {
    async fn generate_images(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageLocator>> {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: prompt.to_string(),
            }],
            parameters: PredictParameters {
                sample_count: self.image_count,
                aspect_ratio: aspect_ratio.as_str().to_string(),
                output_mime_type: OUTPUT_MIME_TYPE.to_string(),
            },
        };

        let response: PredictResponse = self.http.predict(&request).await?;

        let mut images = Vec::with_capacity(response.predictions.len());
        for prediction in response.predictions {
            let Some(data) = prediction.bytes_base64_encoded else {
                tracing::warn!(
                    "Skipping Imagen prediction without image bytes: {}",
                    prediction
                        .rai_filtered_reason
                        .as_deref()
                        .unwrap_or("no reason given")
                );
                continue;
            };

            let bytes = base64::engine::general_purpose::STANDARD
                .decode(data.as_bytes())
                .map_err(|e| {
                    Error::AiProvider(format!("Imagen image base64 decode failed: {}", e))
                })?;
            images.push(ImageLocator::from_bytes(
                &bytes,
                prediction.mime_type.as_deref(),
            ));
        }

        tracing::debug!(
            "Imagen returned {} of {} requested images",
            images.len(),
            self.image_count
        );

        Ok(images)
    }
}
