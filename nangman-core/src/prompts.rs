use crate::config::ContentConfig;
use crate::pipeline::GenerationInput;
use crate::stage::Stage;
use serde::{Deserialize, Serialize};

/// Per-stage sampling parameters for the chat completion call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    pub temperature: f32,
    pub max_tokens: u32,
}

pub fn stage_sampling(stage: Stage) -> Sampling {
    match stage {
        Stage::Title => Sampling {
            temperature: 0.8,
            max_tokens: 500,
        },
        Stage::Script => Sampling {
            temperature: 0.7,
            max_tokens: 1000,
        },
        Stage::Prompts => Sampling {
            temperature: 0.8,
            max_tokens: 2000,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltStagePrompt {
    pub stage: Stage,
    pub user_message: String,
    pub sampling: Sampling,
}

pub fn build_stage_prompt(input: &GenerationInput, cfg: &ContentConfig) -> BuiltStagePrompt {
    let stage = input.stage();
    let user_message = match input {
        GenerationInput::Titles { topic } => build_titles_prompt(topic, cfg),
        GenerationInput::Script { title } => build_script_prompt(title, cfg),
        GenerationInput::Prompts { script, title } => build_image_prompts_prompt(script, title, cfg),
    };
    BuiltStagePrompt {
        stage,
        user_message,
        sampling: stage_sampling(stage),
    }
}

pub fn build_titles_prompt(topic: &str, cfg: &ContentConfig) -> String {
    let numbered = (1..=cfg.title_count)
        .map(|i| format!("{i}. [제목{i}]"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "당신은 YouTube Shorts 전문 콘텐츠 기획자입니다.\n\
\"{channel}\"이라는 채널의 쇼츠 제목을 만들어주세요.\n\n\
채널 컨셉: {concept}\n\n\
주제: {topic}\n\n\
다음 조건을 반드시 지켜주세요:\n\
1. YouTube Shorts 알고리즘에 최적화된 제목 {count}개 생성\n\
2. 각 제목은 {max_len}자 이내\n\
3. 호기심을 자극하고 클릭을 유도하는 문구\n\
4. 감성적이고 공감을 이끌어내는 톤\n\
5. 숫자나 감정 단어 활용 권장\n\n\
형식:\n{numbered}\n",
        channel = cfg.channel_name,
        concept = cfg.channel_concept,
        count = cfg.title_count,
        max_len = cfg.title_max_chars,
    )
}

pub fn build_script_prompt(title: &str, cfg: &ContentConfig) -> String {
    let vocabulary = cfg
        .vocabulary
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .map(|v| format!("### 필수 단어 라이브러리:\n{v}\n\n"))
        .unwrap_or_default();

    format!(
        "당신은 \"{channel}\" 채널의 전문 대본 작가입니다.\n\
YouTube Shorts용 {secs}초 분량의 감성 대본을 작성해주세요.\n\n\
제목: {title}\n\n\
{vocabulary}\
### 대본 작성 규칙:\n\
1. 총 분량: 약 {words}단어 ({secs}초 분량)\n\
2. 구조:\n\
   - 도입: 현재의 지친 상태 묘사\n\
   - 전개: 과거의 낭만적 순간 회상 (80년대 감성)\n\
   - 전환: 깨달음과 위로의 메시지\n\
   - 마무리: 희망적 메시지로 끝맺음\n\
3. 톤: 따뜻하고 감성적인 내레이션 스타일\n\
4. 비유 표현을 자연스럽게 1-2개 포함\n\
5. 짧은 문장, 운율감 있게 작성\n\n\
### 출력 형식:\n\
[도입]\n(대본 내용)\n\n[전개]\n(대본 내용)\n\n[전환]\n(대본 내용)\n\n[마무리]\n(대본 내용)\n\n\
---\n총 예상 시간: 00초\n",
        channel = cfg.channel_name,
        secs = cfg.duration_secs,
        words = cfg.target_word_count(),
    )
}

pub fn build_image_prompts_prompt(script: &str, title: &str, cfg: &ContentConfig) -> String {
    let total = cfg.character_prompt_count + cfg.background_prompt_count;
    let cref = cfg
        .character_reference_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .map(|u| {
            format!(
                "- 캐릭터 일관성을 위해 모든 캐릭터 프롬프트 끝에 다음 추가:\n  --cref {u} --cw 100\n"
            )
        })
        .unwrap_or_default();

    format!(
        "당신은 {style} 전문 미드저니 프롬프트 엔지니어입니다.\n\
아래 대본을 기반으로 미드저니 이미지 프롬프트를 생성해주세요.\n\n\
### 쇼츠 제목:\n{title}\n\n\
### 대본:\n{script}\n\n\
### 절대 규칙:\n\
1. 총 {total}개 생성 (캐릭터 {chars}개 + 배경 {bgs}개)\n\
2. 모든 프롬프트는 반드시 \"{style}\"로 시작\n\
3. 감성이 강하게 나오도록 상세 묘사 필수\n\
4. 영어로 작성\n\n\
### 캐릭터 프롬프트 규칙:\n\
{cref}\
- 20-30대 한국인 캐릭터\n\
- 감정과 상황이 잘 드러나도록 묘사\n\n\
### 배경 프롬프트 규칙:\n\
- 80년대 한국 감성 또는 자연 풍경\n\
- 따뜻하고 노스탤지어 느낌\n\n\
### 출력 형식:\n\
## 캐릭터 프롬프트 ({chars}개)\n1. [장면 설명]\n```\n(프롬프트)\n```\n\n\
## 배경 프롬프트 ({bgs}개)\n1. [장면 설명]\n```\n(프롬프트)\n```\n",
        style = cfg.style_prefix,
        chars = cfg.character_prompt_count,
        bgs = cfg.background_prompt_count,
    )
}
