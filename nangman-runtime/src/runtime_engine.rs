use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use nangman_core::briefing::{render_category_briefing, render_news_list};
use nangman_core::config::{AppConfig, NotificationConfig};
use nangman_core::news::NewsItem;
use nangman_core::types::BriefingFormat;
use nangman_engine::notifier::Notifier;
use nangman_engine::session::PipelineSession;
use nangman_providers::elevenlabs::ElevenLabsTtsConfig;
use nangman_providers::telegram::TelegramBotConfig;

use crate::llm::OpenAiTextGenerator;
use crate::secrets::{SecretKey, resolve_secret};
use crate::telegram::TelegramTransport;
use crate::tts::ElevenLabsSpeechSynthesizer;

/// Build a shorts session from config + stored secrets.
///
/// Missing API keys are not fatal here; the affected call reports them.
pub fn build_session_from_config(cfg: &AppConfig) -> anyhow::Result<PipelineSession> {
    let llm_api_key = resolve_secret(SecretKey::LlmApiKey)?.unwrap_or_default();
    let eleven_key = resolve_secret(SecretKey::ElevenLabsApiKey)?.unwrap_or_default();
    if llm_api_key.is_empty() {
        log::warn!("runtime: no LLM API key configured; generation will fail");
    }

    let generator = Arc::new(OpenAiTextGenerator::new(
        llm_api_key,
        cfg.llm.clone(),
        cfg.content.clone(),
    ));
    let synthesizer = Arc::new(ElevenLabsSpeechSynthesizer::new(
        ElevenLabsTtsConfig {
            base_url: cfg.tts.base_url.clone(),
            api_key: eleven_key,
            model_id: cfg.tts.model_id.clone(),
        },
        tts_output_dir(cfg),
    ));

    Ok(PipelineSession::new(generator, synthesizer)
        .with_timeout(Duration::from_secs(cfg.generation_timeout_secs.max(1))))
}

pub fn tts_output_dir(cfg: &AppConfig) -> PathBuf {
    cfg.tts
        .output_dir
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

pub fn build_telegram_transport(cfg: &AppConfig) -> anyhow::Result<TelegramTransport> {
    let token = resolve_secret(SecretKey::TelegramBotToken)?.ok_or_else(|| {
        anyhow::anyhow!(
            "Telegram bot token is not set (NANGMAN_TELEGRAM_BOT_TOKEN or `nangman secret set telegram`)"
        )
    })?;
    Ok(TelegramTransport::new(
        TelegramBotConfig {
            api_base: cfg.telegram.api_base.clone(),
            bot_token: token,
            disable_web_page_preview: cfg.telegram.disable_web_page_preview,
        },
        Duration::from_secs(cfg.telegram.timeout_secs.max(1)),
    ))
}

/// The configured notifier, or `None` when Telegram delivery is switched off.
pub fn build_notifier(cfg: &AppConfig) -> anyhow::Result<Option<Notifier>> {
    if !cfg.telegram.enabled {
        return Ok(None);
    }
    if cfg.telegram.chat_id.trim().is_empty() {
        return Err(anyhow::anyhow!("telegram.chat_id is not set"));
    }

    let transport = Arc::new(build_telegram_transport(cfg)?);
    Ok(Some(Notifier::new(
        transport,
        cfg.telegram.chat_id.trim(),
        cfg.notification.max_message_len,
        cfg.notification.format_mode,
    )))
}

pub fn render_notification<Tz>(
    cfg: &NotificationConfig,
    items: &[NewsItem],
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match cfg.format {
        BriefingFormat::Category => render_category_briefing(items, now),
        BriefingFormat::Simple => {
            render_news_list(items, cfg.max_news_per_message, cfg.include_summary, now)
        }
    }
}
