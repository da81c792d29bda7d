use super::{ImageGenerationService, PromptEnhancementService};
use crate::models::{AspectRatio, ImageLocator, TextLanguage};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Holds a mock call open until the test releases it, so in-flight state
/// can be observed.
#[derive(Clone, Default)]
pub struct MockGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl MockGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves once a gated call has started.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the gated call finish.
    pub fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Clone)]
pub struct MockPromptClient {
    responses: Arc<Mutex<Vec<String>>>,
    last_request: Arc<Mutex<Option<(String, TextLanguage)>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    gate: Option<MockGate>,
}

impl MockPromptClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            last_request: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            gate: None,
        }
    }

    pub fn with_prompt_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn with_gate(mut self, gate: MockGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<(String, TextLanguage)> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockPromptClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptEnhancementService for MockPromptClient {
    async fn enhance_prompt(&self, concept: &str, language: TextLanguage) -> Result<String> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_request.lock().unwrap() = Some((concept.to_string(), language));

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock prompt failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(format!(
                "A bold thumbnail about {} with {} text",
                concept.trim(),
                language
            ))
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }
}

#[derive(Clone)]
pub struct MockImageGenerationClient {
    responses: Arc<Mutex<Vec<Vec<ImageLocator>>>>,
    last_request: Arc<Mutex<Option<(String, AspectRatio)>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    gate: Option<MockGate>,
}

impl MockImageGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            last_request: Arc::new(Mutex::new(None)),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            gate: None,
        }
    }

    pub fn with_images_response(self, response: Vec<ImageLocator>) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn with_gate(mut self, gate: MockGate) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    pub fn last_request(&self) -> Option<(String, AspectRatio)> {
        self.last_request.lock().unwrap().clone()
    }
}

impl Default for MockImageGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageGenerationService for MockImageGenerationClient {
    async fn generate_images(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Vec<ImageLocator>> {
        let count = {
            let mut count = self.call_count.lock().unwrap();
            *count += 1;
            *count
        };
        *self.last_request.lock().unwrap() = Some((prompt.to_string(), aspect_ratio));

        if let Some(gate) = &self.gate {
            gate.pass().await;
        }

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock image failure".to_string()));
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            // JPEG SOI + APP0 marker is enough for MIME sniffing
            Ok(vec![ImageLocator::from_bytes(
                &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10],
                None,
            )])
        } else {
            Ok(responses[(count - 1) % responses.len()].clone())
        }
    }
}
