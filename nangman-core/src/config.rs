use crate::chunk::DEFAULT_MAX_MESSAGE_LEN;
use crate::types::{BriefingFormat, FormatMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    pub channel_name: String,
    pub channel_concept: String,
    pub title_count: u32,
    pub title_max_chars: u32,
    pub duration_secs: u32,
    pub words_per_second: f32,
    pub style_prefix: String,
    pub character_reference_url: Option<String>,
    pub character_prompt_count: u32,
    pub background_prompt_count: u32,

    // Optional word list injected into the script prompt.
    pub vocabulary: Option<String>,
}

impl ContentConfig {
    pub fn target_word_count(&self) -> u32 {
        (self.duration_secs as f32 * self.words_per_second) as u32
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            channel_name: "낭만처방".into(),
            channel_concept:
                "현대인의 지친 일상에 80년대 감성의 낭만과 위로를 전달하는 힐링 채널".into(),
            title_count: 5,
            title_max_chars: 30,
            duration_secs: 40,
            // Average Korean speaking rate.
            words_per_second: 2.5,
            style_prefix: "Studio Ghibli style".into(),
            character_reference_url: None,
            character_prompt_count: 5,
            background_prompt_count: 5,
            vocabulary: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TtsConfig {
    pub base_url: String,
    pub model_id: String,
    pub voice_id: String,
    pub rate_percent: i32,
    // Defaults to the OS temp dir when unset.
    pub output_dir: Option<String>,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io".into(),
            model_id: "eleven_multilingual_v2".into(),
            voice_id: String::new(),
            rate_percent: 0,
            output_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub enabled: bool,
    pub api_base: String,
    pub chat_id: String,
    pub timeout_secs: u64,
    /// Link previews are shown unless this is set.
    pub disable_web_page_preview: bool,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://api.telegram.org".into(),
            chat_id: String::new(),
            timeout_secs: 10,
            disable_web_page_preview: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub format: BriefingFormat,
    pub format_mode: FormatMode,
    pub max_news_per_message: usize,
    pub include_summary: bool,
    pub max_message_len: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            format: BriefingFormat::Category,
            format_mode: FormatMode::Html,
            max_news_per_message: 5,
            include_summary: true,
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}

/// On-disk application config. Secrets are stored outside this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub telegram: TelegramConfig,
    pub notification: NotificationConfig,
    pub content: ContentConfig,
    pub generation_timeout_secs: u64,
    pub news_path: String,
    pub export_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmConfig::default(),
            tts: TtsConfig::default(),
            telegram: TelegramConfig::default(),
            notification: NotificationConfig::default(),
            content: ContentConfig::default(),
            generation_timeout_secs: 60,
            news_path: "collected_news.json".into(),
            export_dir: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_word_count_matches_duration() {
        assert_eq!(ContentConfig::default().target_word_count(), 100);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{"telegram":{"enabled":true,"chat_id":"42"}}"#).unwrap();
        assert!(cfg.telegram.enabled);
        assert_eq!(cfg.telegram.chat_id, "42");
        assert_eq!(cfg.telegram.timeout_secs, 10);
        assert!(!cfg.telegram.disable_web_page_preview);
        assert_eq!(cfg.notification.max_message_len, 4000);
        assert_eq!(cfg.notification.format, BriefingFormat::Category);
        assert_eq!(cfg.generation_timeout_secs, 60);
    }
}
