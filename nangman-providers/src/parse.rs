use anyhow::{Context, anyhow};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

pub fn parse_openai_chat_completion(body: &[u8]) -> anyhow::Result<String> {
    let resp: OpenAiChatResponse = serde_json::from_slice(body).context("decode chat JSON")?;
    let content = resp
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| anyhow!("no content in chat completion response"))?;
    Ok(content)
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorEnvelope {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// The `error.message` of an OpenAI-style error body, if it has one.
pub fn parse_openai_error(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<OpenAiErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
}

#[derive(Debug, Deserialize)]
struct TelegramEnvelope<T> {
    ok: bool,
    description: Option<String>,
    result: Option<T>,
}

/// Bot API responses carry `ok`; a 200 with `ok: false` is still a failure.
fn parse_telegram_envelope<T: for<'de> Deserialize<'de>>(body: &[u8]) -> anyhow::Result<Option<T>> {
    let env: TelegramEnvelope<T> =
        serde_json::from_slice(body).context("decode Telegram JSON")?;
    if !env.ok {
        return Err(anyhow!(
            "telegram error: {}",
            env.description.unwrap_or_else(|| "unknown error".into())
        ));
    }
    Ok(env.result)
}

pub fn parse_telegram_send_message(body: &[u8]) -> anyhow::Result<()> {
    parse_telegram_envelope::<serde_json::Value>(body).map(|_| ())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TelegramBotInfo {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
}

pub fn parse_telegram_get_me(body: &[u8]) -> anyhow::Result<TelegramBotInfo> {
    parse_telegram_envelope::<TelegramBotInfo>(body)?
        .ok_or_else(|| anyhow!("no result in getMe response"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_openai_chat_content() {
        let body = br#"{"choices":[{"message":{"content":"hi"}}]}"#;
        assert_eq!(parse_openai_chat_completion(body).unwrap(), "hi");
    }

    #[test]
    fn openai_missing_content_errors() {
        let body = br#"{"choices":[{"message":{}}]}"#;
        assert!(parse_openai_chat_completion(body).is_err());
    }

    #[test]
    fn parses_openai_error_message() {
        let body = br#"{"error":{"message":"Invalid API key","type":"auth"}}"#;
        assert_eq!(parse_openai_error(body).as_deref(), Some("Invalid API key"));
        assert_eq!(parse_openai_error(b"not json"), None);
    }

    #[test]
    fn telegram_ok_false_is_an_error() {
        let body = br#"{"ok":false,"error_code":400,"description":"Bad Request: message is too long"}"#;
        let err = parse_telegram_send_message(body).unwrap_err();
        assert!(err.to_string().contains("message is too long"));
    }

    #[test]
    fn telegram_ok_true_succeeds() {
        let body = br#"{"ok":true,"result":{"message_id":7}}"#;
        assert!(parse_telegram_send_message(body).is_ok());
    }

    #[test]
    fn parses_get_me() {
        let body = br#"{"ok":true,"result":{"id":99,"is_bot":true,"first_name":"Nangman","username":"nangman_bot"}}"#;
        let info = parse_telegram_get_me(body).unwrap();
        assert_eq!(info.id, 99);
        assert_eq!(info.username.as_deref(), Some("nangman_bot"));
    }
}
