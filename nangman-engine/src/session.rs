use crate::traits::{GeneratedText, SpeechSynthesizer, TextGenerator};
use nangman_core::clean_script_for_tts;
use nangman_core::error::{GenerationError, PipelineError, SequenceError};
use nangman_core::pipeline::{GenerationInput, PipelineState};
use nangman_core::stage::Stage;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Default)]
struct Inner {
    state: PipelineState,

    // Bumped whenever a stage's in-flight result would be stale.
    tickets: [u64; 3],
    narration_ticket: u64,
}

impl Inner {
    fn bump(&mut self, stage: Stage) -> u64 {
        let t = &mut self.tickets[stage.index()];
        *t = t.wrapping_add(1);
        *t
    }

    fn bump_from(&mut self, stage: Stage) {
        for s in stage.and_later() {
            self.bump(s);
        }
    }
}

/// Async front of a `PipelineState`.
///
/// The lock is only held for state edits, never across a collaborator call, so the
/// session stays responsive while a generation is running. Each stage carries a ticket;
/// a result whose ticket went stale while in flight is discarded.
#[derive(Clone)]
pub struct PipelineSession {
    inner: Arc<Mutex<Inner>>,
    generator: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    timeout: Duration,
}

impl PipelineSession {
    pub fn new(generator: Arc<dyn TextGenerator>, synthesizer: Arc<dyn SpeechSynthesizer>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            generator,
            synthesizer,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn snapshot(&self) -> PipelineState {
        self.inner.lock().await.state.clone()
    }

    pub async fn set_topic(&self, topic: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let changed = inner.state.set_topic(topic);
        if changed {
            inner.bump_from(Stage::Title);
        }
        changed
    }

    pub async fn select_title(&self, title: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let changed = inner.state.select_title(title);
        if changed {
            inner.bump_from(Stage::Script);
        }
        changed
    }

    /// Generates `stage` and stores the result. Returns the stored text.
    pub async fn generate(&self, stage: Stage) -> Result<String, PipelineError> {
        let (input, ticket) = {
            let mut inner = self.inner.lock().await;
            let input = inner.state.begin_generation(stage)?;
            (input, inner.bump(stage))
        };

        log::info!("session: generating {stage}");
        let generated = self.call_generator(&input).await.inspect_err(|e| {
            log::warn!("session: {stage} generation failed: {e}");
        })?;

        let mut inner = self.inner.lock().await;
        if inner.tickets[stage.index()] != ticket {
            log::info!("session: discarding stale {stage} result");
            return Err(GenerationError::Superseded.into());
        }
        inner.state.apply_generation(stage, generated.text.clone())?;
        if let Some(next) = stage.next() {
            inner.bump_from(next);
        }
        log::info!(
            "session: {stage} generated ({} chars, {}/{})",
            generated.text.chars().count(),
            generated.provider,
            generated.model
        );
        Ok(generated.text)
    }

    /// Same as `generate`, but only once the stage has output to replace.
    pub async fn regenerate(&self, stage: Stage) -> Result<String, PipelineError> {
        {
            let inner = self.inner.lock().await;
            if inner.state.output(stage).trim().is_empty() {
                return Err(SequenceError::NotGenerated(stage).into());
            }
        }
        self.generate(stage).await
    }

    pub async fn edit(&self, stage: Stage, text: &str) -> Result<(), SequenceError> {
        let mut inner = self.inner.lock().await;
        inner.state.edit(stage, text)?;
        inner.bump_from(stage);
        Ok(())
    }

    pub async fn approve(&self, stage: Stage) -> Result<(), PipelineError> {
        let mut inner = self.inner.lock().await;
        inner.state.approve(stage)?;
        log::info!("session: {stage} approved");
        Ok(())
    }

    pub async fn revert(&self, stage: Stage) -> Result<(), SequenceError> {
        let mut inner = self.inner.lock().await;
        inner.state.revert(stage)?;
        inner.bump_from(stage);
        log::info!("session: reopened {stage}");
        Ok(())
    }

    pub async fn reset(&self) {
        let mut inner = self.inner.lock().await;
        inner.state.reset();
        inner.bump_from(Stage::Title);
        inner.narration_ticket = inner.narration_ticket.wrapping_add(1);
    }

    /// Renders the current script to speech and records the audio path.
    pub async fn synthesize_narration(
        &self,
        voice_id: &str,
        rate_percent: i32,
    ) -> Result<PathBuf, PipelineError> {
        let (text, script_ticket, ticket) = {
            let mut inner = self.inner.lock().await;
            let text = clean_script_for_tts(inner.state.script());
            if text.is_empty() {
                return Err(SequenceError::NotGenerated(Stage::Script).into());
            }
            inner.narration_ticket = inner.narration_ticket.wrapping_add(1);
            (
                text,
                inner.tickets[Stage::Script.index()],
                inner.narration_ticket,
            )
        };

        log::info!("session: synthesizing narration ({} chars)", text.chars().count());
        let path = match tokio::time::timeout(
            self.timeout,
            self.synthesizer.synthesize(&text, voice_id, rate_percent),
        )
        .await
        {
            Err(_) => return Err(GenerationError::Timeout(self.timeout).into()),
            Ok(Err(e)) => return Err(GenerationError::Failed(format!("{e:#}")).into()),
            Ok(Ok(path)) => path,
        };

        let mut inner = self.inner.lock().await;
        if inner.narration_ticket != ticket || inner.tickets[Stage::Script.index()] != script_ticket
        {
            log::info!("session: discarding stale narration");
            return Err(GenerationError::Superseded.into());
        }
        inner.state.set_narration(path.display().to_string())?;
        Ok(path)
    }

    async fn call_generator(&self, input: &GenerationInput) -> Result<GeneratedText, GenerationError> {
        let fut = async {
            match input {
                GenerationInput::Titles { topic } => self.generator.generate_titles(topic).await,
                GenerationInput::Script { title } => self.generator.generate_script(title).await,
                GenerationInput::Prompts { script, title } => {
                    self.generator.generate_prompts(script, title).await
                }
            }
        };

        match tokio::time::timeout(self.timeout, fut).await {
            Err(_) => Err(GenerationError::Timeout(self.timeout)),
            Ok(Err(e)) => Err(GenerationError::Failed(format!("{e:#}"))),
            Ok(Ok(out)) if out.text.trim().is_empty() => Err(GenerationError::Empty),
            Ok(Ok(out)) => Ok(out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate_titles(&self, topic: &str) -> anyhow::Result<GeneratedText> {
            Ok(out(format!("1. {topic} 하나\n2. {topic} 둘")))
        }
        async fn generate_script(&self, title: &str) -> anyhow::Result<GeneratedText> {
            Ok(out(format!("[도입]\n{title}의 대본")))
        }
        async fn generate_prompts(&self, _script: &str, title: &str) -> anyhow::Result<GeneratedText> {
            Ok(out(format!("Studio Ghibli style, {title}")))
        }
    }

    struct NoSpeech;

    #[async_trait]
    impl SpeechSynthesizer for NoSpeech {
        async fn synthesize(&self, _: &str, _: &str, _: i32) -> anyhow::Result<PathBuf> {
            Ok(PathBuf::from("/tmp/narration.mp3"))
        }
    }

    fn out(text: String) -> GeneratedText {
        GeneratedText {
            text,
            provider: "echo".into(),
            model: "test".into(),
        }
    }

    fn session() -> PipelineSession {
        PipelineSession::new(Arc::new(EchoGenerator), Arc::new(NoSpeech))
    }

    #[tokio::test]
    async fn generate_requires_topic() {
        let s = session();
        let err = s.generate(Stage::Title).await.unwrap_err();
        assert_eq!(err, PipelineError::Sequence(SequenceError::MissingTopic));
    }

    #[tokio::test]
    async fn regenerate_needs_existing_output() {
        let s = session();
        s.set_topic("노을").await;
        let err = s.regenerate(Stage::Title).await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Sequence(SequenceError::NotGenerated(Stage::Title))
        );
        s.generate(Stage::Title).await.unwrap();
        assert!(s.regenerate(Stage::Title).await.is_ok());
    }

    #[tokio::test]
    async fn narration_is_recorded_and_cleared_by_script_edit() {
        let s = session();
        s.set_topic("노을").await;
        s.generate(Stage::Title).await.unwrap();
        s.select_title("노을 하나").await;
        s.approve(Stage::Title).await.unwrap();
        s.generate(Stage::Script).await.unwrap();

        let path = s.synthesize_narration("voice", 0).await.unwrap();
        assert_eq!(path, PathBuf::from("/tmp/narration.mp3"));
        assert_eq!(s.snapshot().await.narration_path(), Some("/tmp/narration.mp3"));

        s.edit(Stage::Script, "새 대본").await.unwrap();
        assert_eq!(s.snapshot().await.narration_path(), None);
    }

    #[tokio::test]
    async fn narration_without_script_is_a_sequence_error() {
        let s = session();
        let err = s.synthesize_narration("voice", 0).await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Sequence(SequenceError::NotGenerated(Stage::Script))
        );
    }
}
