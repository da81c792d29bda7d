//! Application wiring: provider selection and the two-step run.

use crate::ai::{
    GeminiImageClient, GeminiPromptClient, ImageGenerationService, OpenAiImageClient,
    OpenAiPromptClient, PromptEnhancementService,
};
use crate::download::save_images;
use crate::form::{FormController, FormState};
use crate::models::{AiProvider, AspectRatio, Config, TextLanguage};
use crate::{view, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// What the user filled into the form.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub concept: String,
    pub text_language: TextLanguage,
    /// A hand-written prompt; step 1 is skipped when present.
    pub prompt: Option<String>,
    pub aspect_ratio: AspectRatio,
    pub download: bool,
}

/// Injectable service bundle used to construct [`App`] in tests/harnesses.
pub struct AppServices {
    pub enhancer: Arc<dyn PromptEnhancementService>,
    pub generator: Arc<dyn ImageGenerationService>,
    pub http: reqwest::Client,
}

pub struct App {
    form: FormController,
    http: reqwest::Client,
    output_dir: PathBuf,
}

impl App {
    /// Build an app from concrete service dependencies.
    pub fn with_services(services: AppServices, output_dir: PathBuf) -> Self {
        Self {
            form: FormController::new(services.enhancer, services.generator),
            http: services.http,
            output_dir,
        }
    }

    fn build_ai_client<T, FOpenAi, FGemini>(
        provider: AiProvider,
        model: &str,
        api_key: String,
        http_client: reqwest::Client,
        capability: &str,
        openai_builder: FOpenAi,
        gemini_builder: FGemini,
    ) -> T
    where
        FOpenAi: FnOnce(String, String, reqwest::Client) -> T,
        FGemini: FnOnce(String, String, reqwest::Client) -> T,
    {
        match provider {
            AiProvider::OpenAi => {
                info!("{} provider: OpenAI (model: {})", capability, model);
                openai_builder(api_key, model.to_string(), http_client)
            }
            AiProvider::Gemini => {
                info!("{} provider: Gemini (model: {})", capability, model);
                gemini_builder(api_key, model.to_string(), http_client)
            }
        }
    }

    /// Default output directory: `output/<date>_<uuid>`.
    pub fn default_output_dir() -> PathBuf {
        let date = Local::now().format("%Y-%m-%d").to_string();
        PathBuf::from("output").join(format!("{}_{}", date, Uuid::new_v4()))
    }

    /// Construct an app from configuration, using real provider clients.
    pub fn new(config: &Config, output_dir: PathBuf) -> Result<Self> {
        // Reuse one HTTP connection pool across provider clients.
        let http_client = reqwest::Client::new();
        let image_count = config.image_count;

        let enhancer: Arc<dyn PromptEnhancementService> = Self::build_ai_client(
            config.enhance_provider,
            &config.enhance_model,
            config.api_key(config.enhance_provider)?,
            http_client.clone(),
            "Prompt",
            |api_key, model, client| {
                Arc::new(OpenAiPromptClient::new_with_client(api_key, model, client))
                    as Arc<dyn PromptEnhancementService>
            },
            |api_key, model, client| {
                Arc::new(GeminiPromptClient::new_with_client(api_key, model, client))
                    as Arc<dyn PromptEnhancementService>
            },
        );

        let generator: Arc<dyn ImageGenerationService> = Self::build_ai_client(
            config.image_provider,
            &config.image_model,
            config.api_key(config.image_provider)?,
            http_client.clone(),
            "Image",
            |api_key, model, client| {
                Arc::new(OpenAiImageClient::new_with_client(
                    api_key,
                    model,
                    image_count,
                    client,
                )) as Arc<dyn ImageGenerationService>
            },
            |api_key, model, client| {
                Arc::new(GeminiImageClient::new_with_client(
                    api_key,
                    model,
                    image_count,
                    client,
                )) as Arc<dyn ImageGenerationService>
            },
        );

        Ok(Self::with_services(
            AppServices {
                enhancer,
                generator,
                http: http_client,
            },
            output_dir,
        ))
    }

    pub fn form(&self) -> &FormController {
        &self.form
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Current page as text.
    pub fn render(&self) -> String {
        view::render(&self.form.snapshot())
    }

    /// Fill the form, run both steps, and save the results.
    ///
    /// Returns the saved file paths (empty when downloads are disabled).
    pub async fn run(&self, request: &RunRequest) -> Result<Vec<PathBuf>> {
        self.form.set_concept(request.concept.clone());
        self.form.set_text_language(request.text_language);
        self.form.set_aspect_ratio(request.aspect_ratio);

        match &request.prompt {
            Some(prompt) => {
                info!("Using supplied prompt; skipping enhancement");
                self.form.set_prompt(prompt.clone());
            }
            None => self.form.enhance_prompt().await?,
        }

        self.form.generate_images().await?;

        let FormState {
            generated_images, ..
        } = self.form.snapshot();
        let images = generated_images.unwrap_or_default();
        info!("Generation finished with {} images", images.len());

        if !request.download || images.is_empty() {
            return Ok(Vec::new());
        }

        save_images(&images, &self.output_dir, &self.http).await
    }
}
