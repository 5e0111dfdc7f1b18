use base64::Engine;
use reqwest::Client;
use tracing::debug;

use crate::config::GeminiConfig;
use crate::errors::{GeminiError, GeminiResult};
use crate::types::*;

/// MIME type attached to uploaded bills
pub const DOCUMENT_MIME_TYPE: &str = "application/pdf";

/// Client for interacting with the Gemini API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new Gemini API client
    pub fn new(config: GeminiConfig) -> GeminiResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GeminiError::ConfigError(
                    "API key is required to initialize the Gemini client".to_string(),
                )
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            config,
        })
    }

    pub fn model_name(&self) -> &str {
        &self.config.model_name
    }

    /// Get the generateContent URL for the configured model
    fn get_base_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model_name
        )
    }

    /// Generate content using the Gemini API
    pub async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> GeminiResult<GenerateContentResponse> {
        let url = self.get_base_url();

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GeminiError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.map_err(|e| {
                GeminiError::ResponseError(format!("Failed to read error response: {}", e))
            })?;

            return Err(GeminiError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let response_body = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GeminiError::ParsingError(format!("Failed to parse response: {}", e)))?;

        Ok(response_body)
    }

    /// Single-turn prompt with a system instruction
    pub async fn generate(&self, prompt: &str, system_instruction: &str) -> GeminiResult<String> {
        debug!(
            model = %self.config.model_name,
            prompt_len = prompt.len(),
            "Sending generate request"
        );
        let parts = vec![Part::text(prompt.to_string())];
        let request = self.create_prompt_request(parts, system_instruction);
        let response = self.generate_content(request).await?;
        extract_text_from_response(&response)
    }

    /// Single-turn prompt with the file attached ahead of the prompt text
    pub async fn generate_with_file(
        &self,
        file: &[u8],
        file_name: &str,
        prompt: &str,
        system_instruction: &str,
    ) -> GeminiResult<String> {
        debug!(
            model = %self.config.model_name,
            file_name,
            file_size = file.len(),
            prompt_len = prompt.len(),
            "Sending generate request with attachment"
        );
        let encoded = base64::engine::general_purpose::STANDARD.encode(file);
        let parts = vec![
            Part::inline_data(DOCUMENT_MIME_TYPE, encoded),
            Part::text(prompt.to_string()),
        ];
        let request = self.create_prompt_request(parts, system_instruction);
        let response = self.generate_content(request).await?;
        extract_text_from_response(&response)
    }

    /// Continue a conversation. `history` is sent as-is, followed by `message`
    /// as a user turn. Returns `None` when the model produced no text.
    pub async fn chat(&self, history: Vec<Content>, message: &str) -> GeminiResult<Option<String>> {
        debug!(
            model = %self.config.model_name,
            turns = history.len(),
            "Sending chat request"
        );
        let request = create_chat_request(history, message);
        let response = self.generate_content(request).await?;
        Ok(response.text())
    }

    /// Builds a single user turn request using the configured temperature.
    pub(crate) fn create_prompt_request(
        &self,
        parts: Vec<Part>,
        system_instruction: &str,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts,
                role: Some(ROLE_USER.to_string()),
            }],
            system_instruction: Some(Content::user(system_instruction)),
            generation_config: Some(GenerationConfig {
                temperature: Some(self.config.temperature),
            }),
        }
    }
}

pub(crate) fn create_chat_request(
    mut history: Vec<Content>,
    message: &str,
) -> GenerateContentRequest {
    history.push(Content::user(message));
    GenerateContentRequest {
        contents: history,
        system_instruction: None,
        generation_config: None,
    }
}

/// Helper method to extract text from a response
pub fn extract_text_from_response(response: &GenerateContentResponse) -> GeminiResult<String> {
    response
        .text()
        .ok_or_else(|| GeminiError::ResponseError("No content in response".to_string()))
}
