use regex::Regex;
use std::sync::OnceLock;

fn section_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Script section markers such as `[도입]` / `[마무리]`.
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]").expect("valid section header regex"))
}

fn markdown_header_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^#+\s+.*$").expect("valid markdown header regex"))
}

fn rule_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^(?:-+|=+)[ \t]*$").expect("valid rule regex"))
}

fn duration_meta_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"총 예상 시간:.*").expect("valid duration meta regex"))
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n(?:[ \t]*\n)+").expect("valid blank lines regex"))
}

/// Strips layout-only parts of a generated script so only narration reaches TTS.
pub fn clean_script_for_tts(text: &str) -> String {
    let text = text.replace("\r\n", "\n");
    let out = section_header_re().replace_all(&text, "");
    let out = markdown_header_re().replace_all(&out, "");
    let out = rule_line_re().replace_all(&out, "");
    let out = duration_meta_re().replace_all(&out, "");
    let out = blank_lines_re().replace_all(&out, "\n");

    out.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Title lines from the numbered candidate list (`1. [title]` / `2) title`).
pub fn parse_title_candidates(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter_map(|line| {
            let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            let rest = line[digits..].strip_prefix(['.', ')'])?;
            let title = rest.trim().trim_start_matches('[').trim_end_matches(']').trim();
            let title = title.trim_matches('"');
            (!title.is_empty()).then(|| title.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_sections_rules_and_meta() {
        let script = "[도입]\n오늘도 버텼다.\n\n[전개]\n그 시절 골목길.\n\n---\n총 예상 시간: 40초\n";
        assert_eq!(clean_script_for_tts(script), "오늘도 버텼다.\n그 시절 골목길.");
    }

    #[test]
    fn strips_markdown_headers() {
        let script = "## 대본\n첫 문장\n===\n둘째 문장";
        assert_eq!(clean_script_for_tts(script), "첫 문장\n둘째 문장");
    }

    #[test]
    fn keeps_plain_text() {
        assert_eq!(clean_script_for_tts("  그냥 문장  "), "그냥 문장");
        assert_eq!(clean_script_for_tts(""), "");
    }

    #[test]
    fn parses_numbered_titles() {
        let raw = "다음은 제목입니다:\n1. [퇴근길 낭만]\n2) \"지친 하루\"\n3.   노을 한 스푼  \n4.\n";
        assert_eq!(
            parse_title_candidates(raw),
            vec!["퇴근길 낭만", "지친 하루", "노을 한 스푼"]
        );
    }
}
