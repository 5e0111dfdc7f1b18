use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use crate::config::SpeechConfig;
use crate::errors::{SpeechError, SpeechResult};

/// Client for the ElevenLabs text-to-dialogue endpoint
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    config: SpeechConfig,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct DialogueInput<'a> {
    pub text: &'a str,
    pub voice_id: &'a str,
}

#[derive(Serialize, Debug, PartialEq)]
pub(crate) struct DialogueRequest<'a> {
    pub inputs: Vec<DialogueInput<'a>>,
    pub model_id: &'a str,
    pub language_code: &'a str,
}

impl ElevenLabsClient {
    pub fn new(config: SpeechConfig) -> SpeechResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SpeechError::ConfigError(
                    "API key is required to initialize the ElevenLabs client".to_string(),
                )
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/text-to-dialogue/stream",
            self.config.base_url.trim_end_matches('/')
        )
    }

    pub(crate) fn build_request<'a>(&'a self, text: &'a str) -> DialogueRequest<'a> {
        DialogueRequest {
            inputs: vec![DialogueInput {
                text,
                voice_id: &self.config.voice_id,
            }],
            model_id: &self.config.model_id,
            language_code: &self.config.language_code,
        }
    }

    /// Synthesize `text` with the configured voice and return the raw audio bytes
    pub async fn synthesize(&self, text: &str) -> SpeechResult<Vec<u8>> {
        debug!(
            voice_id = %self.config.voice_id,
            text_len = text.len(),
            "Sending text-to-speech request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("xi-api-key", &self.api_key)
            .json(&self.build_request(text))
            .send()
            .await
            .map_err(|e| SpeechError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(SpeechError::HttpError {
                status_code: status.as_u16(),
                message: format!("API request failed: {}", error_body),
            });
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| SpeechError::RequestError(format!("Failed to read audio: {}", e)))?;

        Ok(audio.to_vec())
    }
}
