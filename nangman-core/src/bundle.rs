use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Write as _};

/// Everything an approved session produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBundle {
    pub topic: String,
    pub title: String,
    pub title_candidates: String,
    pub script: String,
    pub prompts: String,
    pub narration_path: Option<String>,
}

pub fn export_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("nangman_shorts_{}.txt", now.format("%Y%m%d_%H%M%S"))
}

/// Plain-text export of a bundle.
pub fn render_bundle_export<Tz>(bundle: &ContentBundle, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let heavy = "=".repeat(60);
    let light = "-".repeat(40);
    let mut out = String::new();

    let _ = writeln!(out, "{heavy}");
    let _ = writeln!(out, "🌸 낭만처방 쇼츠 생성 결과");
    let _ = writeln!(out, "생성일시: {}", now.format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(out, "{heavy}\n");

    let mut section = |heading: &str, body: &str| {
        if body.trim().is_empty() {
            return;
        }
        let _ = writeln!(out, "{heading}\n{light}\n{}\n", body.trim_end());
    };

    section("📌 선택된 제목", &bundle.title);
    section("📋 생성된 제목 후보들", &bundle.title_candidates);
    section("📝 대본", &bundle.script);
    section("🎨 미드저니 프롬프트", &bundle.prompts);
    if let Some(path) = &bundle.narration_path {
        section("🔊 내레이션 파일", path);
    }

    out
}
