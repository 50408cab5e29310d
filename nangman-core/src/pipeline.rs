use crate::bundle::ContentBundle;
use crate::error::{ApprovalError, GenerationError, PipelineError, SequenceError};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Upstream inputs captured for one generation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationInput {
    Titles { topic: String },
    Script { title: String },
    Prompts { script: String, title: String },
}

impl GenerationInput {
    pub fn stage(&self) -> Stage {
        match self {
            GenerationInput::Titles { .. } => Stage::Title,
            GenerationInput::Script { .. } => Stage::Script,
            GenerationInput::Prompts { .. } => Stage::Prompts,
        }
    }
}

/// The per-session record behind the step-gated content flow.
///
/// Invariants:
/// - `approved[Script]` implies `approved[Title]`, `approved[Prompts]` implies `approved[Script]`.
/// - changing the output of stage k clears the approval of k and every later stage.
/// - `stage` never points past the lowest unapproved stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineState {
    topic: String,
    stage: Stage,
    title_candidates: String,
    selected_title: String,
    script: String,
    prompts_text: String,
    approved: [bool; 3],

    // Narration is derived from the script and goes stale with it.
    narration_path: Option<String>,
}

impl PipelineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn title_candidates(&self) -> &str {
        &self.title_candidates
    }

    pub fn selected_title(&self) -> &str {
        &self.selected_title
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn prompts_text(&self) -> &str {
        &self.prompts_text
    }

    pub fn narration_path(&self) -> Option<&str> {
        self.narration_path.as_deref()
    }

    /// The generated text a stage holds (the raw candidate list for `Title`).
    pub fn output(&self, stage: Stage) -> &str {
        match stage {
            Stage::Title => &self.title_candidates,
            Stage::Script => &self.script,
            Stage::Prompts => &self.prompts_text,
        }
    }

    pub fn is_approved(&self, stage: Stage) -> bool {
        self.approved[stage.index()]
    }

    pub fn is_complete(&self) -> bool {
        self.approved.iter().all(|a| *a)
    }

    pub fn lowest_unapproved(&self) -> Option<Stage> {
        Stage::ALL.into_iter().find(|s| !self.is_approved(*s))
    }

    /// Returns true when the topic changed. A new topic reopens stage 1.
    pub fn set_topic(&mut self, topic: impl Into<String>) -> bool {
        let topic = topic.into().trim().to_string();
        if topic == self.topic {
            return false;
        }
        self.topic = topic;
        if self.is_approved(Stage::Title) {
            self.invalidate_from(Stage::Title);
        }
        true
    }

    /// Returns true when the selection changed. Changing an approved title reopens stage 1.
    pub fn select_title(&mut self, title: impl Into<String>) -> bool {
        let title = title.into().trim().to_string();
        if title == self.selected_title {
            return false;
        }
        self.selected_title = title;
        if self.is_approved(Stage::Title) {
            self.invalidate_from(Stage::Title);
        }
        true
    }

    /// Checks the approval gate for `stage` and captures its upstream inputs.
    pub fn begin_generation(&self, stage: Stage) -> Result<GenerationInput, SequenceError> {
        self.check_sequence(stage)?;
        match stage {
            Stage::Title => {
                if self.topic.is_empty() {
                    return Err(SequenceError::MissingTopic);
                }
                Ok(GenerationInput::Titles {
                    topic: self.topic.clone(),
                })
            }
            Stage::Script => Ok(GenerationInput::Script {
                title: self.selected_title.clone(),
            }),
            Stage::Prompts => Ok(GenerationInput::Prompts {
                script: self.script.clone(),
                title: self.selected_title.clone(),
            }),
        }
    }

    /// Stores freshly generated text for `stage`.
    ///
    /// Always clears approval of `stage` and later stages, even when the text is unchanged.
    /// Empty output is rejected and the previous output is kept.
    pub fn apply_generation(
        &mut self,
        stage: Stage,
        text: impl Into<String>,
    ) -> Result<(), PipelineError> {
        self.check_sequence(stage)?;
        let text = text.into();
        if text.trim().is_empty() {
            return Err(GenerationError::Empty.into());
        }
        self.set_output(stage, text);
        self.invalidate_from(stage);
        Ok(())
    }

    /// User override of a stage's output. For `Title` this edits the selected title.
    pub fn edit(&mut self, stage: Stage, text: impl Into<String>) -> Result<(), SequenceError> {
        self.check_sequence(stage)?;
        match stage {
            Stage::Title => self.selected_title = text.into().trim().to_string(),
            _ => self.set_output(stage, text.into()),
        }
        self.invalidate_from(stage);
        Ok(())
    }

    pub fn approve(&mut self, stage: Stage) -> Result<(), PipelineError> {
        self.check_sequence(stage)?;

        if self.output(stage).trim().is_empty() {
            return Err(ApprovalError::EmptyOutput(stage).into());
        }
        if stage == Stage::Title {
            if self.selected_title.is_empty() {
                return Err(ApprovalError::MissingTitleSelection.into());
            }
            if self.selected_title == self.title_candidates.trim() {
                return Err(ApprovalError::SelectionIsCandidateList.into());
            }
        }

        self.approved[stage.index()] = true;
        if let Some(next) = stage.next() {
            self.stage = self.stage.max(next);
        }
        Ok(())
    }

    /// Reopens `stage` for changes: clears its approval and everything after it.
    pub fn revert(&mut self, stage: Stage) -> Result<(), SequenceError> {
        self.check_sequence(stage)?;
        self.invalidate_from(stage);
        self.stage = stage;
        Ok(())
    }

    pub fn set_narration(&mut self, path: impl Into<String>) -> Result<(), SequenceError> {
        if self.script.trim().is_empty() {
            return Err(SequenceError::NotGenerated(Stage::Script));
        }
        self.narration_path = Some(path.into());
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The approved content, available once every stage is approved.
    pub fn bundle(&self) -> Option<ContentBundle> {
        if !self.is_complete() {
            return None;
        }
        Some(ContentBundle {
            topic: self.topic.clone(),
            title: self.selected_title.clone(),
            title_candidates: self.title_candidates.clone(),
            script: self.script.clone(),
            prompts: self.prompts_text.clone(),
            narration_path: self.narration_path.clone(),
        })
    }

    fn check_sequence(&self, stage: Stage) -> Result<(), SequenceError> {
        match stage.previous() {
            Some(prev) if !self.is_approved(prev) => Err(SequenceError::NotApproved {
                requested: stage,
                missing: self.lowest_unapproved().unwrap_or(prev),
            }),
            _ => Ok(()),
        }
    }

    fn set_output(&mut self, stage: Stage, text: String) {
        match stage {
            Stage::Title => self.title_candidates = text,
            Stage::Script => {
                self.script = text;
                self.narration_path = None;
            }
            Stage::Prompts => self.prompts_text = text,
        }
    }

    fn invalidate_from(&mut self, stage: Stage) {
        for s in stage.and_later() {
            self.approved[s.index()] = false;
        }
        if self.stage > stage {
            self.stage = stage;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TITLES: &str = "1. 퇴근길 낭만 한 스푼\n2. 지친 하루 끝의 위로\n3. 80년대 골목의 기억\n4. 오늘도 수고한 당신에게\n5. 노을 아래 쉼표 하나";

    fn approved_title() -> PipelineState {
        let mut s = PipelineState::new();
        s.set_topic("퇴근 후 지친 마음");
        s.apply_generation(Stage::Title, TITLES).unwrap();
        s.select_title("지친 하루 끝의 위로");
        s.approve(Stage::Title).unwrap();
        s
    }

    fn fully_approved() -> PipelineState {
        let mut s = approved_title();
        s.apply_generation(Stage::Script, "[도입]\n오늘도 버텼다.").unwrap();
        s.approve(Stage::Script).unwrap();
        s.apply_generation(Stage::Prompts, "Studio Ghibli style, dusk alley").unwrap();
        s.approve(Stage::Prompts).unwrap();
        s
    }

    fn assert_invariants(s: &PipelineState) {
        if s.is_approved(Stage::Script) {
            assert!(s.is_approved(Stage::Title));
        }
        if s.is_approved(Stage::Prompts) {
            assert!(s.is_approved(Stage::Script));
        }
        if let Some(lowest) = s.lowest_unapproved() {
            assert!(s.stage() <= lowest);
        }
    }

    #[test]
    fn new_state_is_empty_at_title() {
        let s = PipelineState::new();
        assert_eq!(s.stage(), Stage::Title);
        assert_eq!(s.lowest_unapproved(), Some(Stage::Title));
        assert!(s.bundle().is_none());
    }

    #[test]
    fn title_generation_requires_topic() {
        let s = PipelineState::new();
        assert_eq!(
            s.begin_generation(Stage::Title),
            Err(SequenceError::MissingTopic)
        );
    }

    #[test]
    fn script_and_prompts_are_gated() {
        let mut s = PipelineState::new();
        s.set_topic("topic");
        assert_eq!(
            s.begin_generation(Stage::Script),
            Err(SequenceError::NotApproved {
                requested: Stage::Script,
                missing: Stage::Title
            })
        );
        assert_eq!(
            s.begin_generation(Stage::Prompts),
            Err(SequenceError::NotApproved {
                requested: Stage::Prompts,
                missing: Stage::Title
            })
        );
        assert!(matches!(
            s.approve(Stage::Script),
            Err(PipelineError::Sequence(_))
        ));
        assert!(matches!(
            s.apply_generation(Stage::Prompts, "x"),
            Err(PipelineError::Sequence(_))
        ));
    }

    #[test]
    fn approving_script_requires_title_approval() {
        let mut s = PipelineState::new();
        s.set_topic("topic");
        s.apply_generation(Stage::Title, TITLES).unwrap();
        s.select_title("퇴근길 낭만 한 스푼");
        assert!(s.approve(Stage::Script).is_err());
        assert!(s.approve(Stage::Prompts).is_err());
        assert_invariants(&s);

        s.approve(Stage::Title).unwrap();
        assert_eq!(s.stage(), Stage::Script);
        assert!(s.approve(Stage::Script).is_err(), "script is still empty");
        assert!(s.approve(Stage::Prompts).is_err());
        assert_invariants(&s);
    }

    #[test]
    fn title_approval_needs_a_distinct_selection() {
        let mut s = PipelineState::new();
        s.set_topic("topic");
        assert_eq!(
            s.approve(Stage::Title),
            Err(ApprovalError::EmptyOutput(Stage::Title).into())
        );

        s.apply_generation(Stage::Title, TITLES).unwrap();
        assert_eq!(
            s.approve(Stage::Title),
            Err(ApprovalError::MissingTitleSelection.into())
        );

        s.select_title(format!("  {TITLES}\n"));
        assert_eq!(
            s.approve(Stage::Title),
            Err(ApprovalError::SelectionIsCandidateList.into())
        );
        assert!(!s.is_approved(Stage::Title));
    }

    #[test]
    fn generation_captures_approved_upstream_inputs() {
        let mut s = approved_title();
        assert_eq!(
            s.begin_generation(Stage::Script),
            Ok(GenerationInput::Script {
                title: "지친 하루 끝의 위로".into()
            })
        );

        s.apply_generation(Stage::Script, "script body").unwrap();
        s.approve(Stage::Script).unwrap();
        let input = s.begin_generation(Stage::Prompts).unwrap();
        assert_eq!(input.stage(), Stage::Prompts);
        assert_eq!(
            input,
            GenerationInput::Prompts {
                script: "script body".into(),
                title: "지친 하루 끝의 위로".into()
            }
        );
    }

    #[test]
    fn empty_generation_keeps_previous_output() {
        let mut s = approved_title();
        s.apply_generation(Stage::Script, "first").unwrap();
        s.approve(Stage::Script).unwrap();

        let err = s.apply_generation(Stage::Script, "  \n ").unwrap_err();
        assert_eq!(err, PipelineError::Generation(GenerationError::Empty));
        assert_eq!(s.script(), "first");
        assert!(s.is_approved(Stage::Script), "failed attempt must not touch approvals");
    }

    #[test]
    fn editing_script_clears_script_and_prompts_approval() {
        let mut s = fully_approved();
        s.edit(Stage::Script, "edited").unwrap();

        assert!(s.is_approved(Stage::Title));
        assert!(!s.is_approved(Stage::Script));
        assert!(!s.is_approved(Stage::Prompts));
        assert_eq!(s.stage(), Stage::Script);
        assert_eq!(s.script(), "edited");
        assert_invariants(&s);

        // Any further change keeps it unapproved.
        s.edit(Stage::Script, "edited again").unwrap();
        assert!(!s.is_approved(Stage::Script));
        assert!(!s.is_approved(Stage::Prompts));
    }

    #[test]
    fn regenerating_identical_text_still_clears_approvals() {
        for stage in Stage::ALL {
            let mut s = fully_approved();
            let same = s.output(stage).to_string();
            s.apply_generation(stage, same).unwrap();
            for later in stage.and_later() {
                assert!(!s.is_approved(later), "{later} should be cleared by {stage}");
            }
            assert_eq!(s.stage(), stage);
            assert_invariants(&s);
        }
    }

    #[test]
    fn changing_approved_title_selection_reopens_everything() {
        let mut s = fully_approved();
        assert!(!s.select_title("지친 하루 끝의 위로"), "same selection is a no-op");
        assert!(s.is_complete());

        assert!(s.select_title("노을 아래 쉼표 하나"));
        assert_eq!(s.lowest_unapproved(), Some(Stage::Title));
        assert_eq!(s.stage(), Stage::Title);
        assert_invariants(&s);
    }

    #[test]
    fn revert_moves_pointer_back() {
        let mut s = fully_approved();
        s.revert(Stage::Script).unwrap();
        assert_eq!(s.stage(), Stage::Script);
        assert!(s.is_approved(Stage::Title));
        assert!(!s.is_approved(Stage::Script));
        assert_eq!(s.script(), "[도입]\n오늘도 버텼다.", "revert keeps the text");

        let mut fresh = PipelineState::new();
        assert!(fresh.revert(Stage::Prompts).is_err());
    }

    #[test]
    fn script_change_drops_narration() {
        let mut s = approved_title();
        assert_eq!(
            s.set_narration("/tmp/a.mp3"),
            Err(SequenceError::NotGenerated(Stage::Script))
        );
        s.apply_generation(Stage::Script, "body").unwrap();
        s.set_narration("/tmp/a.mp3").unwrap();
        assert_eq!(s.narration_path(), Some("/tmp/a.mp3"));

        s.edit(Stage::Script, "body 2").unwrap();
        assert_eq!(s.narration_path(), None);
    }

    #[test]
    fn bundle_only_when_complete_and_reset_clears() {
        let mut s = fully_approved();
        let bundle = s.bundle().unwrap();
        assert_eq!(bundle.title, "지친 하루 끝의 위로");
        assert_eq!(bundle.topic, "퇴근 후 지친 마음");
        assert_eq!(s.stage(), Stage::Prompts);

        s.reset();
        assert_eq!(s, PipelineState::new());
    }

    #[test]
    fn arbitrary_operation_sequences_keep_invariants() {
        // Deterministic walk over a mix of legal and illegal operations.
        let mut s = PipelineState::new();
        let mut seed: u32 = 7;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let stage = Stage::ALL[(seed >> 8) as usize % 3];
            let had_title = s.is_approved(Stage::Title);
            match (seed >> 16) % 7 {
                0 => {
                    s.set_topic(if seed % 2 == 0 { "a" } else { "b" });
                }
                1 => {
                    let _ = s.apply_generation(stage, TITLES);
                }
                2 => {
                    s.select_title(if seed % 3 == 0 { "x" } else { "y" });
                }
                3 => {
                    let _ = s.edit(stage, "edited");
                }
                4 => {
                    let ok = s.approve(stage).is_ok();
                    if ok && stage == Stage::Script {
                        assert!(had_title);
                    }
                }
                5 => {
                    let _ = s.revert(stage);
                }
                _ => {
                    if seed % 50 == 0 {
                        s.reset();
                    }
                }
            }
            assert_invariants(&s);
        }
    }
}
