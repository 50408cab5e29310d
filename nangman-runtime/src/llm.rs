use nangman_core::config::{ContentConfig, LlmConfig};
use nangman_core::pipeline::GenerationInput;
use nangman_core::prompts::build_stage_prompt;
use nangman_engine::traits::{GeneratedText, TextGenerator};
use nangman_providers::openai_compatible::{
    ChatMessage, OpenAiCompatibleChatConfig, build_chat_completions_request,
};
use nangman_providers::parse::{parse_openai_chat_completion, parse_openai_error};
use nangman_providers::runtime;

/// Stage text through an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiTextGenerator {
    api_key: String,
    llm: LlmConfig,
    content: ContentConfig,
}

impl std::fmt::Debug for OpenAiTextGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTextGenerator")
            .field("api_key", &"[REDACTED]")
            .field("llm", &self.llm)
            .finish()
    }
}

impl OpenAiTextGenerator {
    pub fn new(api_key: impl Into<String>, llm: LlmConfig, content: ContentConfig) -> Self {
        Self {
            api_key: api_key.into(),
            llm,
            content,
        }
    }

    async fn complete(&self, input: GenerationInput) -> anyhow::Result<GeneratedText> {
        if self.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "LLM API key is not set (NANGMAN_LLM_API_KEY or `nangman secret set llm`)"
            ));
        }

        let built = build_stage_prompt(&input, &self.content);
        let cfg = OpenAiCompatibleChatConfig {
            base_url: self.llm.base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.llm.model.clone(),
        };
        let req = build_chat_completions_request(
            &cfg,
            &[ChatMessage::user(built.user_message)],
            built.sampling,
        );
        let resp = runtime::execute(&req).await?;

        if !resp.is_success() {
            let detail =
                parse_openai_error(&resp.body).unwrap_or_else(|| resp.body_snippet(300));
            return Err(anyhow::anyhow!(
                "OpenAI-compatible request failed: status={} {}",
                resp.status,
                detail
            ));
        }

        let text = parse_openai_chat_completion(&resp.body)?;
        Ok(GeneratedText {
            text: text.trim().to_string(),
            provider: "openai-compatible".into(),
            model: self.llm.model.clone(),
        })
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate_titles(&self, topic: &str) -> anyhow::Result<GeneratedText> {
        self.complete(GenerationInput::Titles {
            topic: topic.into(),
        })
        .await
    }

    async fn generate_script(&self, title: &str) -> anyhow::Result<GeneratedText> {
        self.complete(GenerationInput::Script {
            title: title.into(),
        })
        .await
    }

    async fn generate_prompts(&self, script: &str, title: &str) -> anyhow::Result<GeneratedText> {
        self.complete(GenerationInput::Prompts {
            script: script.into(),
            title: title.into(),
        })
        .await
    }
}
