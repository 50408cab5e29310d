use nangman_core::types::FormatMode;
use nangman_engine::traits::ChatTransport;
use nangman_providers::parse::{TelegramBotInfo, parse_telegram_get_me, parse_telegram_send_message};
use nangman_providers::runtime;
use nangman_providers::telegram::{
    TelegramBotConfig, build_get_me_request, build_send_message_request,
};
use std::time::Duration;

/// Bot API transport. The token lives in the URL, so it never appears in logs or errors.
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    cfg: TelegramBotConfig,
    timeout: Duration,
}

impl TelegramTransport {
    pub fn new(cfg: TelegramBotConfig, timeout: Duration) -> Self {
        Self { cfg, timeout }
    }

    pub async fn get_me(&self) -> anyhow::Result<TelegramBotInfo> {
        let resp = runtime::execute_with_timeout(&build_get_me_request(&self.cfg), self.timeout)
            .await?;
        parse_telegram_get_me(&resp.body)
    }
}

#[async_trait::async_trait]
impl ChatTransport for TelegramTransport {
    async fn send_message(&self, chat_id: &str, text: &str, mode: FormatMode) -> anyhow::Result<()> {
        let req = build_send_message_request(&self.cfg, chat_id, text, mode);
        let resp = runtime::execute_with_timeout(&req, self.timeout).await?;

        // Error replies still carry the JSON envelope with `description`.
        parse_telegram_send_message(&resp.body).map_err(|e| {
            anyhow::anyhow!("sendMessage failed: status={} {e}", resp.status)
        })
    }
}
