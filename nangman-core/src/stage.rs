use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three ordered content-generation phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Title,
    Script,
    Prompts,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Title, Stage::Script, Stage::Prompts];

    pub fn index(self) -> usize {
        match self {
            Stage::Title => 0,
            Stage::Script => 1,
            Stage::Prompts => 2,
        }
    }

    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Title => Some(Stage::Script),
            Stage::Script => Some(Stage::Prompts),
            Stage::Prompts => None,
        }
    }

    pub fn previous(self) -> Option<Stage> {
        match self {
            Stage::Title => None,
            Stage::Script => Some(Stage::Title),
            Stage::Prompts => Some(Stage::Script),
        }
    }

    /// This stage and every stage after it, in order.
    pub fn and_later(self) -> impl Iterator<Item = Stage> {
        Stage::ALL.into_iter().filter(move |s| *s >= self)
    }

    // A stable string label for UI display and logs.
    pub fn label(self) -> &'static str {
        match self {
            Stage::Title => "title",
            Stage::Script => "script",
            Stage::Prompts => "prompts",
        }
    }

    pub fn parse(value: &str) -> Option<Stage> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "title" | "titles" => Some(Stage::Title),
            "2" | "script" => Some(Stage::Script),
            "3" | "prompt" | "prompts" => Some(Stage::Prompts),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
