use crate::openai_compatible::join_url;
use crate::request::{Body, HttpRequest};
use serde_json::json;

pub const MIN_SPEED: f32 = 0.7;
pub const MAX_SPEED: f32 = 1.2;

#[derive(Clone, PartialEq, Eq)]
pub struct ElevenLabsTtsConfig {
    pub base_url: String,
    pub api_key: String,
    pub model_id: String,
}

impl std::fmt::Debug for ElevenLabsTtsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabsTtsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("model_id", &self.model_id)
            .finish()
    }
}

/// Maps a percentage rate adjustment (`+10` => 10% faster) onto the API's speed range.
pub fn rate_to_speed(rate_percent: i32) -> f32 {
    (1.0 + rate_percent as f32 / 100.0).clamp(MIN_SPEED, MAX_SPEED)
}

pub fn build_elevenlabs_tts_request(
    cfg: &ElevenLabsTtsConfig,
    voice_id: &str,
    text: &str,
    rate_percent: i32,
) -> HttpRequest {
    let url = join_url(
        &cfg.base_url,
        &format!("/v1/text-to-speech/{voice_id}?output_format=mp3_44100_128"),
    );

    let payload = json!({
        "text": text,
        "model_id": cfg.model_id,
        "voice_settings": {
            "speed": rate_to_speed(rate_percent),
        },
    });

    HttpRequest {
        method: "POST".into(),
        url,
        headers: vec![
            ("Content-Type".into(), "application/json".into()),
            ("Accept".into(), "audio/mpeg".into()),
            ("xi-api-key".into(), cfg.api_key.clone()),
        ],
        body: Body::Json(payload.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_is_clamped_to_supported_speed() {
        assert_eq!(rate_to_speed(0), 1.0);
        assert!((rate_to_speed(10) - 1.1).abs() < 1e-6);
        assert_eq!(rate_to_speed(50), MAX_SPEED);
        assert_eq!(rate_to_speed(-80), MIN_SPEED);
    }

    #[test]
    fn builds_json_request_with_xi_api_key() {
        let cfg = ElevenLabsTtsConfig {
            base_url: "https://api.elevenlabs.io".into(),
            api_key: "k".into(),
            model_id: "eleven_multilingual_v2".into(),
        };
        let req = build_elevenlabs_tts_request(&cfg, "voice-1", "안녕하세요", 10);
        assert_eq!(req.method, "POST");
        assert!(req.url.contains("/v1/text-to-speech/voice-1"));
        assert_eq!(req.header("xi-api-key"), Some("k"));
        assert_eq!(req.header("accept"), Some("audio/mpeg"));

        match req.body {
            Body::Json(s) => {
                let v: serde_json::Value = serde_json::from_str(&s).unwrap();
                assert_eq!(v["text"], "안녕하세요");
                assert_eq!(v["model_id"], "eleven_multilingual_v2");
                assert!(v["voice_settings"]["speed"].as_f64().unwrap() > 1.0);
            }
            _ => panic!("expected json"),
        }
    }
}
