use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const UNKNOWN_SOURCE: &str = "알 수 없음";
pub const UNTITLED: &str = "제목 없음";

/// Collector hours window: items older than this are dropped.
pub const DEFAULT_RECENT_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Category {
    Korean,
    English,
    #[default]
    Unknown,
    Other(String),
}

impl Category {
    /// Fixed briefing priority; categories outside it sort after `Unknown`.
    pub const PRIORITY: [Category; 3] = [Category::Korean, Category::English, Category::Unknown];

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "korean" => Category::Korean,
            "english" => Category::English,
            "" | "unknown" => Category::Unknown,
            _ => Category::Other(value.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Category::Korean => "korean",
            Category::English => "english",
            Category::Unknown => "unknown",
            Category::Other(s) => s,
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| Category::parse(&s)).unwrap_or_default())
    }
}

fn default_source() -> String {
    UNKNOWN_SOURCE.to_string()
}

fn default_title() -> String {
    UNTITLED.to_string()
}

/// A collected news item. Missing fields fall back at the JSON boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default, with = "lenient_timestamp")]
    pub published: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub category: Category,
}

impl NewsItem {
    pub fn new(source: impl Into<String>, title: impl Into<String>, category: Category) -> Self {
        Self {
            source: source.into(),
            title: title.into(),
            link: String::new(),
            summary: String::new(),
            published: None,
            category,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = link.into();
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_published(mut self, published: DateTime<FixedOffset>) -> Self {
        self.published = Some(published);
        self
    }
}

/// The collector's persisted JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArchive {
    #[serde(default, with = "lenient_timestamp")]
    pub collected_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub total_count: usize,
    #[serde(default)]
    pub news: Vec<NewsItem>,
}

impl NewsArchive {
    /// Builds an archive with items sorted newest first (undated items last).
    pub fn new(mut news: Vec<NewsItem>, collected_at: DateTime<FixedOffset>) -> Self {
        news.sort_by(|a, b| b.published.cmp(&a.published));
        Self {
            collected_at: Some(collected_at),
            total_count: news.len(),
            news,
        }
    }

    pub fn empty() -> Self {
        Self {
            collected_at: None,
            total_count: 0,
            news: vec![],
        }
    }

    /// Drops items published before the recency window. Undated items are kept.
    pub fn retain_recent(&mut self, now: DateTime<Utc>, hours: i64) {
        self.news
            .retain(|item| item.published.is_none_or(|p| is_recent(p, now, hours)));
        self.total_count = self.news.len();
    }
}

pub fn is_recent(published: DateTime<FixedOffset>, now: DateTime<Utc>, hours: i64) -> bool {
    published.with_timezone(&Utc) >= now - Duration::hours(hours)
}

// The collector writes naive local timestamps (`2024-05-01T09:30:00.123456`) as well as
// offset-aware ones. Naive values are read as UTC; unparseable values become `None`.
mod lenient_timestamp {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<FixedOffset>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<FixedOffset>>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<FixedOffset>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts);
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc().fixed_offset())
    }
}
