use anyhow::Context;
use nangman_engine::traits::SpeechSynthesizer;
use nangman_providers::elevenlabs::{ElevenLabsTtsConfig, build_elevenlabs_tts_request};
use nangman_providers::runtime;
use std::path::PathBuf;
use std::time::Duration;

// Long scripts take a while to render.
const TTS_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct ElevenLabsSpeechSynthesizer {
    cfg: ElevenLabsTtsConfig,
    output_dir: PathBuf,
}

impl std::fmt::Debug for ElevenLabsSpeechSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsSpeechSynthesizer")
            .field("cfg", &self.cfg)
            .field("output_dir", &self.output_dir)
            .finish()
    }
}

impl ElevenLabsSpeechSynthesizer {
    pub fn new(cfg: ElevenLabsTtsConfig, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            cfg,
            output_dir: output_dir.into(),
        }
    }
}

/// `nangman_tts_{voice}_{rate}.mp3`, with the voice id reduced to filename-safe chars.
pub fn narration_file_name(voice_id: &str, rate_percent: i32) -> String {
    let voice: String = voice_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("nangman_tts_{voice}_{rate_percent:+}.mp3")
}

#[async_trait::async_trait]
impl SpeechSynthesizer for ElevenLabsSpeechSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        rate_percent: i32,
    ) -> anyhow::Result<PathBuf> {
        if self.cfg.api_key.trim().is_empty() {
            return Err(anyhow::anyhow!(
                "ElevenLabs API key is not set (NANGMAN_ELEVENLABS_API_KEY or `nangman secret set elevenlabs`)"
            ));
        }
        if voice_id.trim().is_empty() {
            return Err(anyhow::anyhow!("no TTS voice configured (tts.voice_id)"));
        }

        let req = build_elevenlabs_tts_request(&self.cfg, voice_id, text, rate_percent);
        let resp = runtime::execute_with_timeout(&req, TTS_REQUEST_TIMEOUT).await?;
        if !resp.is_success() {
            return Err(anyhow::anyhow!(
                "ElevenLabs TTS failed: status={} body={}",
                resp.status,
                resp.body_snippet(300)
            ));
        }
        if resp.body.is_empty() {
            return Err(anyhow::anyhow!("ElevenLabs TTS returned no audio"));
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("create tts directory: {}", self.output_dir.display()))?;
        let path = self
            .output_dir
            .join(narration_file_name(voice_id, rate_percent));
        tokio::fs::write(&path, &resp.body)
            .await
            .with_context(|| format!("write narration: {}", path.display()))?;

        log::info!("tts: wrote {} ({} bytes)", path.display(), resp.body.len());
        Ok(path)
    }
}
