pub mod intent;
pub mod ollama;

use async_trait::async_trait;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Single-shot, non-streaming completion of `prompt`.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}
