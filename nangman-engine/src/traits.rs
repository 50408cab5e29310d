use async_trait::async_trait;
use nangman_core::types::FormatMode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Hard per-message limit of the Telegram Bot API.
pub const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedText {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_titles(&self, topic: &str) -> anyhow::Result<GeneratedText>;
    async fn generate_script(&self, title: &str) -> anyhow::Result<GeneratedText>;
    async fn generate_prompts(&self, script: &str, title: &str) -> anyhow::Result<GeneratedText>;
}

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Writes narration audio for `text` and returns where it landed.
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        rate_percent: i32,
    ) -> anyhow::Result<PathBuf>;
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str, mode: FormatMode)
    -> anyhow::Result<()>;

    fn max_message_len(&self) -> usize {
        MAX_MESSAGE_LEN
    }
}
