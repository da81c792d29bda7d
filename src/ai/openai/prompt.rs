use super::client::OpenAiHttpClient;
use super::types::{ChatCompletionRequest, ChatMessage};
use crate::ai::PromptEnhancementService;
use crate::models::TextLanguage;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use std::time::Duration;

pub struct OpenAiPromptClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiPromptClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::new_with_client(api_key, model, reqwest::Client::new())
    }

    pub fn new_with_client(api_key: String, model: String, client: reqwest::Client) -> Self {
        Self {
            http: OpenAiHttpClient::new_with_client(api_key, Duration::from_secs(30), client),
            model,
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }
}

#[async_trait]
impl PromptEnhancementService for OpenAiPromptClient {
    async fn enhance_prompt(&self, concept: &str, language: TextLanguage) -> Result<String> {
        let system_message = ChatMessage {
            role: "system".to_string(),
            content: Some(prompts::ENHANCE_SYSTEM.to_string()),
        };

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(prompts::enhance_user_message(concept, language)),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![system_message, user_message],
            max_completion_tokens: 2048,
        };

        let response = self.http.chat_completion(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string)
            .ok_or_else(|| Error::AiProvider("No response from OpenAI chat API".to_string()))
    }
}
