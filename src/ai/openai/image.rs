use super::client::OpenAiHttpClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::ai::ImageGenerationService;
use crate::models::{AspectRatio, ImageLocator};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiImageClient {
    http: OpenAiHttpClient,
    model: String,
    image_count: u32,
}

impl OpenAiImageClient {
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
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(120), client),
            model,
            image_count,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    fn size_for(aspect_ratio: AspectRatio) -> &'static str {
        match aspect_ratio {
            AspectRatio::Wide => "1536x1024",
            AspectRatio::Tall => "1024x1536",
        }
    }
}

#[async_trait]
impl ImageGenerationService for OpenAiImageClient {
    async fn generate_images(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageLocator>> {
        let request = ImageGenerationRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            n: self.image_count,
            size: Self::size_for(aspect_ratio).to_string(),
            quality: "medium".to_string(),
        };

        let response: ImageGenerationResponse =
            self.http.post("/v1/images/generations", &request).await?;

        let mut images = Vec::with_capacity(response.data.len());
        for item in response.data {
            if let Some(b64_json) = &item.b64_json {
                use base64::Engine as _;
                let bytes = base64::engine::general_purpose::STANDARD
                    .decode(b64_json)
                    .map_err(|e| {
                        Error::AiProvider(format!("Failed to decode base64 image: {}", e))
                    })?;
                images.push(ImageLocator::from_bytes(&bytes, None));
            } else if let Some(url) = item.url {
                images.push(ImageLocator::from_url(url));
            } else {
                tracing::warn!("OpenAI image item had neither base64 nor URL; skipping");
            }
        }

        Ok(images)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_client(server: &MockServer, image_count: u32) -> OpenAiImageClient {
        OpenAiImageClient::new("key".to_string(), "gpt-image-1".to_string(), image_count)
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_generate_images_handles_b64_and_url_items() {
        let server = MockServer::start().await;

        use base64::Engine as _;
        let fake_image = vec![0x89, 0x50, 0x4E, 0x47];
        let b64 = base64::engine::general_purpose::STANDARD.encode(&fake_image);

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    { "b64_json": b64 },
                    { "url": "https://images.example.com/2.png" }
                ]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, 2);

        let images = client
            .generate_images("a thumbnail", AspectRatio::Wide)
            .await
            .unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(
            images[0].decode_data_url().unwrap(),
            ("image/png".to_string(), fake_image)
        );
        assert_eq!(images[1].as_str(), "https://images.example.com/2.png");
    }

    #[tokio::test]
    async fn test_tall_ratio_requests_portrait_size() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .and(body_partial_json(serde_json::json!({
                "n": 3,
                "size": "1024x1536"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, 3);

        let images = client
            .generate_images("a thumbnail", AspectRatio::Tall)
            .await
            .unwrap();
        assert!(images.is_empty());
    }

    #[tokio::test]
    async fn test_generate_images_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/images/generations"))
            .respond_with(ResponseTemplate::new(500).set_body_string("server error"))
            .mount(&server)
            .await;

        let client = make_client(&server, 1);

        let err = client
            .generate_images("a thumbnail", AspectRatio::Wide)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::AiProvider(_)));
    }

    #[test]
    fn test_generation_uses_two_minute_timeout() {
        let client = OpenAiImageClient::new("key".to_string(), "gpt-image-1".to_string(), 4);
        assert_eq!(client.http.timeout(), Duration::from_secs(120));
    }
}
