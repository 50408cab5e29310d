use anyhow::Context;

/// Where we store secrets in the OS keyring.
///
/// This is intentionally constant so upgrades don't orphan secrets.
const SERVICE: &str = "nangman";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKey {
    LlmApiKey,
    ElevenLabsApiKey,
    TelegramBotToken,
}

impl SecretKey {
    fn user(self) -> &'static str {
        match self {
            SecretKey::LlmApiKey => "llm_api_key",
            SecretKey::ElevenLabsApiKey => "elevenlabs_api_key",
            SecretKey::TelegramBotToken => "telegram_bot_token",
        }
    }

    pub fn env_var(self) -> &'static str {
        match self {
            SecretKey::LlmApiKey => "NANGMAN_LLM_API_KEY",
            SecretKey::ElevenLabsApiKey => "NANGMAN_ELEVENLABS_API_KEY",
            SecretKey::TelegramBotToken => "NANGMAN_TELEGRAM_BOT_TOKEN",
        }
    }

    /// CLI name: `llm`, `elevenlabs` or `telegram`.
    pub fn parse(value: &str) -> Option<SecretKey> {
        match value.trim().to_ascii_lowercase().as_str() {
            "llm" | "openai" => Some(SecretKey::LlmApiKey),
            "elevenlabs" | "tts" => Some(SecretKey::ElevenLabsApiKey),
            "telegram" | "bot" => Some(SecretKey::TelegramBotToken),
            _ => None,
        }
    }
}

pub fn set_secret(key: SecretKey, value: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    entry.set_password(value).context("set secret")
}

pub fn get_secret(key: SecretKey) -> anyhow::Result<Option<String>> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;

    match entry.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)).context("get secret"),
    }
}

pub fn delete_secret(key: SecretKey) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, key.user()).context("create keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e)).context("delete secret"),
    }
}

/// Env var first, then the keyring. Empty values count as unset.
pub fn resolve_secret(key: SecretKey) -> anyhow::Result<Option<String>> {
    if let Some(v) = env_override(key, |name| std::env::var(name).ok()) {
        return Ok(Some(v));
    }
    Ok(get_secret(key)?.filter(|v| !v.trim().is_empty()))
}

fn env_override(key: SecretKey, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
    lookup(key.env_var())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
