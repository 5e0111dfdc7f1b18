use async_trait::async_trait;
use solar_core::{Content, ElevenLabsClient, GeminiClient, GeminiResult, SpeechResult};

/// Text generation backend used by the energy service
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate text from a prompt and a system instruction
    async fn generate(&self, prompt: &str, system_instruction: &str) -> GeminiResult<String>;

    /// Same as [`Generator::generate`] with a file attached to the prompt
    async fn generate_with_file(
        &self,
        file: &[u8],
        file_name: &str,
        prompt: &str,
        system_instruction: &str,
    ) -> GeminiResult<String>;

    /// Continue a conversation; `None` when the model returned no content
    async fn chat(&self, history: Vec<Content>, message: &str) -> GeminiResult<Option<String>>;
}

/// Speech synthesis backend
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> SpeechResult<Vec<u8>>;
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> GeminiResult<String> {
        GeminiClient::generate(self, prompt, system_instruction).await
    }

    async fn generate_with_file(
        &self,
        file: &[u8],
        file_name: &str,
        prompt: &str,
        system_instruction: &str,
    ) -> GeminiResult<String> {
        GeminiClient::generate_with_file(self, file, file_name, prompt, system_instruction).await
    }

    async fn chat(&self, history: Vec<Content>, message: &str) -> GeminiResult<Option<String>> {
        GeminiClient::chat(self, history, message).await
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str) -> SpeechResult<Vec<u8>> {
        ElevenLabsClient::synthesize(self, text).await
    }
}
