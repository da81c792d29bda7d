//! Two-step thumbnail form: concept → prompt → images.
//!
//! [`FormController`] owns the form state and sequences the two user-triggered
//! actions. Each action runs `Idle → Busy → Idle`, guarded by its own busy
//! flag; a trigger while busy is refused rather than queued. State lives
//! behind a mutex so a view can read it while a request is in flight. The
//! lock is never held across an `.await`.

use crate::ai::{ImageGenerationService, PromptEnhancementService};
use crate::models::{AspectRatio, ImageLocator, TextLanguage};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{error, info};

pub const MSG_EMPTY_CONCEPT: &str = "Please enter a concept to enhance.";
pub const MSG_ENHANCE_FAILED: &str = "Failed to create prompt. Please try again.";
pub const MSG_EMPTY_PROMPT: &str = "Please enter a description for your thumbnail.";
pub const MSG_GENERATE_FAILED: &str =
    "Failed to generate thumbnails. Please check the logs for details.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Enhance,
    Generate,
}

impl fmt::Display for FormAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormAction::Enhance => f.write_str("prompt enhancement"),
            FormAction::Generate => f.write_str("image generation"),
        }
    }
}

/// Why an action did not apply a result.
///
/// `Validation` and `Service` carry the same text that was put into
/// [`FormState::error`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Service(String),

    #[error("{0} is already in progress")]
    Busy(FormAction),
}

/// Everything the page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub concept: String,
    pub text_language: TextLanguage,
    pub prompt: String,
    pub aspect_ratio: AspectRatio,
    pub is_enhancing: bool,
    pub is_generating: bool,
    pub generated_images: Option<Vec<ImageLocator>>,
    pub error: Option<String>,
}

impl FormState {
    /// Whether the "Create Prompt" control is enabled.
    pub fn can_enhance(&self) -> bool {
        !self.is_enhancing && !self.concept.trim().is_empty()
    }

    /// Whether the "Generate Images" control is enabled.
    pub fn can_generate(&self) -> bool {
        !self.is_generating && !self.prompt.trim().is_empty()
    }
}

pub struct FormController {
    state: Arc<Mutex<FormState>>,
    enhancer: Arc<dyn PromptEnhancementService>,
    generator: Arc<dyn ImageGenerationService>,
}

impl FormController {
    pub fn new(
        enhancer: Arc<dyn PromptEnhancementService>,
        generator: Arc<dyn ImageGenerationService>,
    ) -> Self {
        Self::with_state(FormState::default(), enhancer, generator)
    }

    pub fn with_state(
        state: FormState,
        enhancer: Arc<dyn PromptEnhancementService>,
        generator: Arc<dyn ImageGenerationService>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            enhancer,
            generator,
        }
    }

    // Every mutation completes before the guard drops, so a poisoned lock
    // still holds consistent state.
    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> FormState {
        self.state().clone()
    }

    pub fn can_enhance(&self) -> bool {
        self.state().can_enhance()
    }

    pub fn can_generate(&self) -> bool {
        self.state().can_generate()
    }

    pub fn set_concept(&self, concept: impl Into<String>) {
        self.state().concept = concept.into();
    }

    pub fn set_text_language(&self, language: TextLanguage) {
        self.state().text_language = language;
    }

    pub fn set_prompt(&self, prompt: impl Into<String>) {
        self.state().prompt = prompt.into();
    }

    /// Only affects later generations and the rendered layout.
    pub fn set_aspect_ratio(&self, aspect_ratio: AspectRatio) {
        self.state().aspect_ratio = aspect_ratio;
    }

    /// Step 1: expand the concept into a detailed prompt.
    pub async fn enhance_prompt(&self) -> Result<(), FormError> {
        let (concept, language) = {
            let mut state = self.state();
            if state.is_enhancing {
                return Err(FormError::Busy(FormAction::Enhance));
            }
            if state.concept.trim().is_empty() {
                state.error = Some(MSG_EMPTY_CONCEPT.to_string());
                return Err(FormError::Validation(MSG_EMPTY_CONCEPT.to_string()));
            }

            state.is_enhancing = true;
            state.error = None;
            (state.concept.clone(), state.text_language)
        };

        info!("Enhancing concept ({} chars, language: {})", concept.len(), language);
        let result = self.enhancer.enhance_prompt(&concept, language).await;

        let mut state = self.state();
        state.is_enhancing = false;
        match result {
            Ok(prompt) => {
                info!("Prompt ready ({} chars)", prompt.len());
                state.prompt = prompt;
                Ok(())
            }
            Err(e) => {
                error!("Prompt enhancement failed: {}", e);
                state.error = Some(MSG_ENHANCE_FAILED.to_string());
                Err(FormError::Service(MSG_ENHANCE_FAILED.to_string()))
            }
        }
    }

    /// Step 2: generate images for the current prompt and aspect ratio.
    pub async fn generate_images(&self) -> Result<(), FormError> {
        let (prompt, aspect_ratio) = {
            let mut state = self.state();
            if state.is_generating {
                return Err(FormError::Busy(FormAction::Generate));
            }
            if state.prompt.trim().is_empty() {
                state.error = Some(MSG_EMPTY_PROMPT.to_string());
                return Err(FormError::Validation(MSG_EMPTY_PROMPT.to_string()));
            }

            state.is_generating = true;
            state.error = None;
            state.generated_images = None;
            (state.prompt.clone(), state.aspect_ratio)
        };

        info!("Generating images ({} aspect ratio)", aspect_ratio);
        let result = self.generator.generate_images(&prompt, aspect_ratio).await;

        let mut state = self.state();
        state.is_generating = false;
        match result {
            Ok(images) => {
                info!("Received {} generated images", images.len());
                state.generated_images = Some(images);
                Ok(())
            }
            Err(e) => {
                error!("Image generation failed: {}", e);
                state.error = Some(MSG_GENERATE_FAILED.to_string());
                Err(FormError::Service(MSG_GENERATE_FAILED.to_string()))
            }
        }
    }
}
