use crate::news::{Category, NewsItem};
use chrono::{DateTime, TimeZone};
use std::fmt::{Display, Write as _};

pub const NO_NEWS_MESSAGE: &str = "📰 오늘 수집된 AI 뉴스가 없습니다.";

const RULE: &str = "━━━━━━━━━━━━━━━━━";
const ITEMS_PER_CATEGORY: usize = 3;
const SUMMARY_PREVIEW_CHARS: usize = 150;

/// Escapes the characters Telegram's HTML parse mode treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn category_heading(category: &Category) -> String {
    match category {
        Category::Korean => "🇰🇷 한국 뉴스".into(),
        Category::English => "🌍 글로벌 뉴스".into(),
        Category::Unknown | Category::Other(_) => "📰 기타 뉴스".into(),
    }
}

fn category_short_label(category: &Category) -> &'static str {
    match category {
        Category::Korean => "🇰🇷 한국",
        Category::English => "🌍 글로벌",
        Category::Unknown | Category::Other(_) => "📰 기타",
    }
}

/// Stable partition of items into the fixed order korean, english, unknown.
///
/// Categories outside that list fall into the unknown group, so the fallback label
/// appears once. Empty groups are omitted and items keep their input order within a group.
pub fn group_by_category(items: &[NewsItem]) -> Vec<(Category, Vec<&NewsItem>)> {
    let mut groups: Vec<(Category, Vec<&NewsItem>)> = Category::PRIORITY
        .iter()
        .map(|c| (c.clone(), Vec::new()))
        .collect();

    for item in items {
        let bucket = match item.category {
            Category::Korean => 0,
            Category::English => 1,
            Category::Unknown | Category::Other(_) => 2,
        };
        groups[bucket].1.push(item);
    }

    groups.retain(|(_, bucket)| !bucket.is_empty());
    groups
}

fn push_header<Tz>(message: &mut String, title: &str, now: &DateTime<Tz>, total: usize)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let _ = writeln!(message, "🤖 <b>{title}</b>");
    let _ = writeln!(message, "📅 {}", now.format("%Y년 %m월 %d일 %H:%M"));
    let _ = writeln!(message, "📊 총 {total}개의 뉴스");
    let _ = writeln!(message, "{RULE}");
    message.push('\n');
}

/// The category briefing: at most three items per category plus a remainder count.
pub fn render_category_briefing<Tz>(items: &[NewsItem], now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if items.is_empty() {
        return NO_NEWS_MESSAGE.to_string();
    }

    let mut message = String::new();
    push_header(&mut message, "AI 뉴스 브리핑", now, items.len());

    for (category, group) in group_by_category(items) {
        let _ = writeln!(
            message,
            "<b>{}</b> ({}개)\n",
            category_heading(&category),
            group.len()
        );

        for (i, news) in group.iter().take(ITEMS_PER_CATEGORY).enumerate() {
            let _ = writeln!(message, "{}. {}", i + 1, escape_html(&news.title));
            let _ = writeln!(
                message,
                "   📌 {} | <a href='{}'>링크</a>\n",
                escape_html(&news.source),
                news.link
            );
        }

        if group.len() > ITEMS_PER_CATEGORY {
            let _ = writeln!(
                message,
                "   ... 외 {}개\n",
                group.len() - ITEMS_PER_CATEGORY
            );
        }
    }

    message
}

fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => (&text[..idx], true),
        None => (text, false),
    }
}

/// The simple briefing: the first `max_news` items with optional summaries.
pub fn render_news_list<Tz>(
    items: &[NewsItem],
    max_news: usize,
    include_summary: bool,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if items.is_empty() {
        return NO_NEWS_MESSAGE.to_string();
    }

    let mut message = String::new();
    push_header(&mut message, "AI 뉴스 브리핑", now, items.len());

    for (i, news) in items.iter().take(max_news).enumerate() {
        let _ = writeln!(message, "{}. <b>{}</b>", i + 1, escape_html(&news.title));
        let _ = writeln!(message, "   📌 출처: {}", escape_html(&news.source));

        if include_summary && !news.summary.is_empty() {
            let (preview, truncated) = truncate_chars(&news.summary, SUMMARY_PREVIEW_CHARS);
            let ellipsis = if truncated { "..." } else { "" };
            let _ = writeln!(message, "   💬 {}{ellipsis}", escape_html(preview));
        }

        let _ = writeln!(message, "   🔗 <a href='{}'>기사 보기</a>\n", news.link);
    }

    if items.len() > max_news {
        let _ = writeln!(
            message,
            "📚 외 {}개의 뉴스가 더 있습니다.",
            items.len() - max_news
        );
    }

    message
}

/// Collection statistics: counts by source (most first) and by category.
pub fn render_stats<Tz>(items: &[NewsItem], now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut message = String::from("📊 <b>오늘의 AI 뉴스 통계</b>\n");
    if items.is_empty() {
        message.push_str("\n수집된 뉴스가 없습니다. 😔");
        return message;
    }

    let _ = writeln!(message, "📅 {}", now.format("%Y년 %m월 %d일"));
    let _ = writeln!(message, "{RULE}\n");
    let _ = writeln!(message, "📰 <b>총 수집 뉴스:</b> {}개\n", items.len());

    // First-seen order breaks ties so output is deterministic.
    let mut by_source: Vec<(&str, usize)> = Vec::new();
    for item in items {
        match by_source.iter_mut().find(|(s, _)| *s == item.source) {
            Some((_, n)) => *n += 1,
            None => by_source.push((&item.source, 1)),
        }
    }
    by_source.sort_by(|a, b| b.1.cmp(&a.1));

    message.push_str("<b>📌 소스별 통계:</b>\n");
    for (source, count) in by_source {
        let _ = writeln!(message, "  • {}: {count}개", escape_html(source));
    }

    message.push_str("\n<b>🌍 카테고리별 통계:</b>\n");
    for (category, group) in group_by_category(items) {
        let _ = writeln!(
            message,
            "  • {}: {}개",
            category_short_label(&category),
            group.len()
        );
    }

    message
}
