use crate::stage::Stage;
use std::time::Duration;
use thiserror::Error;

/// The upstream generator failed; prior output and approvals are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("generation failed: {0}")]
    Failed(String),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("generator returned empty output")]
    Empty,
    // A newer request for the same stage started while this one was in flight.
    #[error("result discarded: superseded by a newer request")]
    Superseded,
}

/// Approval preconditions are unmet. Purely a user-input correction case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApprovalError {
    #[error("{0} output is empty; generate it first")]
    EmptyOutput(Stage),
    #[error("select a title before approving")]
    MissingTitleSelection,
    #[error("selected title must be a single title, not the whole candidate list")]
    SelectionIsCandidateList,
}

/// A stage was requested out of order. The UI should never expose these transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    #[error("{requested} requires {missing} to be approved first")]
    NotApproved { requested: Stage, missing: Stage },
    #[error("enter a topic before generating titles")]
    MissingTopic,
    #[error("{0} has not been generated yet")]
    NotGenerated(Stage),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Approval(#[from] ApprovalError),
    #[error(transparent)]
    Sequence(#[from] SequenceError),
}

impl PipelineError {
    /// Whether retrying the same call can reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PipelineError::Generation(
                GenerationError::Failed(_) | GenerationError::Timeout(_) | GenerationError::Empty
            )
        )
    }
}
