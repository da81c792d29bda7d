//! AI service integration for prompt enhancement and image generation
//!
//! Each capability sits behind its own trait so the form can mix providers
//! (Gemini or OpenAI) and tests can substitute mocks.

pub mod gemini;
pub mod mime;
pub mod mock;
pub mod openai;

pub use gemini::{GeminiImageClient, GeminiPromptClient};
pub use mock::{MockImageGenerationClient, MockPromptClient};
pub use openai::{OpenAiImageClient, OpenAiPromptClient};

use crate::models::{AspectRatio, ImageLocator, TextLanguage};
use crate::Result;
use async_trait::async_trait;

/// Expands a short concept into a detailed image-generation prompt.
#[async_trait]
pub trait PromptEnhancementService: Send + Sync {
    async fn enhance_prompt(&self, concept: &str, language: TextLanguage) -> Result<String>;
}

/// Produces zero or more images for a prompt.
#[async_trait]
pub trait ImageGenerationService: Send + Sync {
    async fn generate_images(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageLocator>>;
}
