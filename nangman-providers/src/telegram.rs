use crate::openai_compatible::join_url;
use crate::request::{Body, HttpRequest};
use nangman_core::types::FormatMode;
use serde_json::json;

#[derive(Clone, PartialEq, Eq)]
pub struct TelegramBotConfig {
    pub api_base: String,
    pub bot_token: String,
    pub disable_web_page_preview: bool,
}

impl std::fmt::Debug for TelegramBotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramBotConfig")
            .field("api_base", &self.api_base)
            .field("bot_token", &"[REDACTED]")
            .field("disable_web_page_preview", &self.disable_web_page_preview)
            .finish()
    }
}

fn method_url(cfg: &TelegramBotConfig, method: &str) -> String {
    join_url(&cfg.api_base, &format!("/bot{}/{method}", cfg.bot_token))
}

pub fn build_send_message_request(
    cfg: &TelegramBotConfig,
    chat_id: &str,
    text: &str,
    mode: FormatMode,
) -> HttpRequest {
    let mut payload = json!({
        "chat_id": chat_id,
        "text": text,
        "disable_web_page_preview": cfg.disable_web_page_preview,
    });
    if let Some(parse_mode) = mode.parse_mode() {
        payload["parse_mode"] = json!(parse_mode);
    }

    HttpRequest {
        method: "POST".into(),
        url: method_url(cfg, "sendMessage"),
        headers: vec![("Content-Type".into(), "application/json".into())],
        body: Body::Json(payload.to_string()),
    }
}

pub fn build_get_me_request(cfg: &TelegramBotConfig) -> HttpRequest {
    HttpRequest {
        method: "GET".into(),
        url: method_url(cfg, "getMe"),
        headers: vec![],
        body: Body::Empty,
    }
}
