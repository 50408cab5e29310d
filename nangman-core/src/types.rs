use serde::{Deserialize, Serialize};

/// Chat transport formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatMode {
    #[default]
    Html,
    Markdown,
    Plain,
}

impl FormatMode {
    /// The Telegram `parse_mode` value, if any.
    pub fn parse_mode(self) -> Option<&'static str> {
        match self {
            FormatMode::Html => Some("HTML"),
            FormatMode::Markdown => Some("Markdown"),
            FormatMode::Plain => None,
        }
    }
}

/// Which briefing layout the notifier renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BriefingFormat {
    Simple,
    #[default]
    Category,
}

impl BriefingFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(BriefingFormat::Simple),
            "category" => Some(BriefingFormat::Category),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes_match_telegram_names() {
        assert_eq!(FormatMode::Html.parse_mode(), Some("HTML"));
        assert_eq!(FormatMode::Markdown.parse_mode(), Some("Markdown"));
        assert_eq!(FormatMode::Plain.parse_mode(), None);
    }

    #[test]
    fn briefing_format_parses_case_insensitively() {
        assert_eq!(BriefingFormat::parse("Simple"), Some(BriefingFormat::Simple));
        assert_eq!(BriefingFormat::parse("category"), Some(BriefingFormat::Category));
        assert_eq!(BriefingFormat::parse("fancy"), None);
    }
}
