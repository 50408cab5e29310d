use chrono::Local;
use nangman_core::config::AppConfig;
use nangman_core::error::PipelineError;
use nangman_core::pipeline::PipelineState;
use nangman_core::stage::Stage;
use nangman_core::text::parse_title_candidates;
use nangman_engine::session::PipelineSession;
use nangman_runtime::bundle_export::export_bundle;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
commands:
  topic <text>          set the topic (reopens titles)
  gen [stage]           generate a stage (default: current)
  regen [stage]         regenerate a stage that already has output
  select <n|title>      pick title candidate n, or type a title
  edit <stage>          replace a stage's text; finish with a line containing only '.'
  approve [stage]       approve a stage (default: current)
  revert <stage>        reopen a stage and everything after it
  tts [voice] [rate%]   narrate the current script
  show                  print the session
  save                  export the approved bundle
  reset                 start over
  quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Topic(String),
    Generate(Option<Stage>),
    Regenerate(Option<Stage>),
    Select(String),
    Edit(Stage),
    Approve(Option<Stage>),
    Revert(Stage),
    Tts {
        voice: Option<String>,
        rate_percent: Option<i32>,
    },
    Show,
    Save,
    Reset,
    Help,
    Quit,
}

fn stage_arg(arg: &str) -> Result<Option<Stage>, String> {
    if arg.is_empty() {
        return Ok(None);
    }
    Stage::parse(arg)
        .map(Some)
        .ok_or_else(|| format!("unknown stage {arg:?} (title, script, prompts or 1-3)"))
}

fn required_stage(arg: &str) -> Result<Stage, String> {
    stage_arg(arg)?.ok_or_else(|| "a stage is required (title, script or prompts)".to_string())
}

pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (cmd, arg) = line
        .split_once(char::is_whitespace)
        .map(|(c, a)| (c, a.trim()))
        .unwrap_or((line, ""));

    match cmd.to_ascii_lowercase().as_str() {
        "topic" if !arg.is_empty() => Ok(ReplCommand::Topic(arg.to_string())),
        "topic" => Err("usage: topic <text>".into()),
        "gen" | "generate" => Ok(ReplCommand::Generate(stage_arg(arg)?)),
        "regen" | "regenerate" => Ok(ReplCommand::Regenerate(stage_arg(arg)?)),
        "select" if !arg.is_empty() => Ok(ReplCommand::Select(arg.to_string())),
        "select" => Err("usage: select <n|title>".into()),
        "edit" => Ok(ReplCommand::Edit(required_stage(arg)?)),
        "approve" | "ok" => Ok(ReplCommand::Approve(stage_arg(arg)?)),
        "revert" => Ok(ReplCommand::Revert(required_stage(arg)?)),
        "tts" => {
            let mut parts = arg.split_whitespace();
            let voice = parts.next().map(str::to_string);
            let rate_percent = parts
                .next()
                .map(|r| {
                    r.trim_end_matches('%')
                        .parse::<i32>()
                        .map_err(|_| format!("invalid rate {r:?}"))
                })
                .transpose()?;
            Ok(ReplCommand::Tts {
                voice,
                rate_percent,
            })
        }
        "show" => Ok(ReplCommand::Show),
        "save" => Ok(ReplCommand::Save),
        "reset" => Ok(ReplCommand::Reset),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command {other:?}; type `help`")),
    }
}

/// A numeric selection picks from the parsed candidate list; anything else is taken verbatim.
pub fn resolve_selection(state: &PipelineState, arg: &str) -> Result<String, String> {
    let Ok(n) = arg.parse::<usize>() else {
        return Ok(arg.to_string());
    };
    let candidates = parse_title_candidates(state.title_candidates());
    n.checked_sub(1)
        .and_then(|i| candidates.get(i).cloned())
        .ok_or_else(|| format!("no title candidate #{n} ({} available)", candidates.len()))
}

/// Export failures are reported, never fatal: the approved session stays in memory.
fn save_bundle(state: &PipelineState, dir: &Path) -> Result<PathBuf, String> {
    let bundle = state
        .bundle()
        .ok_or_else(|| "approve all three stages before saving".to_string())?;
    export_bundle(dir, &bundle, &Local::now()).map_err(|e| format!("{e:#}"))
}

fn render_state(state: &PipelineState) -> String {
    let mut out = format!(
        "topic: {}\ncurrent stage: {}\n",
        if state.topic().is_empty() { "-" } else { state.topic() },
        state.stage()
    );
    for stage in Stage::ALL {
        let mark = if state.is_approved(stage) { "✅" } else { "⬜" };
        out.push_str(&format!("\n{mark} [{}] {stage}\n", stage.index() + 1));
        let body = state.output(stage);
        if !body.trim().is_empty() {
            out.push_str(body.trim_end());
            out.push('\n');
        }
        if stage == Stage::Title && !state.selected_title().is_empty() {
            out.push_str(&format!("→ selected: {}\n", state.selected_title()));
        }
    }
    if let Some(path) = state.narration_path() {
        out.push_str(&format!("\n🔊 narration: {path}\n"));
    }
    out
}

fn report(label: &str, err: &PipelineError) {
    if err.is_retryable() {
        println!("⚠️  {label}: {err} (retry with `regen`)");
    } else {
        println!("❌ {label}: {err}");
    }
}

async fn read_block(lines: &mut Lines<BufReader<Stdin>>) -> anyhow::Result<Option<String>> {
    let mut block = Vec::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            return Ok(Some(block.join("\n")));
        }
        block.push(line);
    }
    Ok(None)
}

fn spawn_generation(session: &PipelineSession, stage: Stage, regenerate: bool) {
    let session = session.clone();
    tokio::spawn(async move {
        let result = if regenerate {
            session.regenerate(stage).await
        } else {
            session.generate(stage).await
        };
        match result {
            Ok(text) => println!("\n✨ {stage} ready:\n{}\n", text.trim_end()),
            Err(e) => report(&format!("{stage} generation"), &e),
        }
    });
}

pub async fn run(
    session: PipelineSession,
    cfg: &AppConfig,
    topic: Option<String>,
) -> anyhow::Result<()> {
    if let Some(topic) = topic {
        session.set_topic(&topic).await;
    }
    println!("🌸 {} shorts\n{HELP}\n", cfg.content.channel_name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let cmd = match parse_command(&line) {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        match cmd {
            ReplCommand::Topic(topic) => {
                if session.set_topic(&topic).await {
                    println!("topic set");
                }
            }
            ReplCommand::Generate(stage) => {
                let stage = match stage {
                    Some(s) => s,
                    None => session.snapshot().await.stage(),
                };
                println!("⏳ generating {stage}...");
                spawn_generation(&session, stage, false);
            }
            ReplCommand::Regenerate(stage) => {
                let stage = match stage {
                    Some(s) => s,
                    None => session.snapshot().await.stage(),
                };
                println!("⏳ regenerating {stage}...");
                spawn_generation(&session, stage, true);
            }
            ReplCommand::Select(arg) => {
                let state = session.snapshot().await;
                match resolve_selection(&state, &arg) {
                    Ok(title) => {
                        session.select_title(&title).await;
                        println!("selected: {title}");
                    }
                    Err(msg) => println!("{msg}"),
                }
            }
            ReplCommand::Edit(stage) => {
                println!("enter new {stage} text, end with '.':");
                let Some(text) = read_block(&mut lines).await? else {
                    break;
                };
                match session.edit(stage, &text).await {
                    Ok(()) => println!("{stage} updated; approve it again to continue"),
                    Err(e) => println!("❌ {e}"),
                }
            }
            ReplCommand::Approve(stage) => {
                let stage = match stage {
                    Some(s) => s,
                    None => session.snapshot().await.stage(),
                };
                if let Err(e) = session.approve(stage).await {
                    report("approve", &e);
                } else if session.snapshot().await.is_complete() {
                    println!("✅ all stages approved; `save` to export");
                } else {
                    println!("✅ {stage} approved");
                }
            }
            ReplCommand::Revert(stage) => match session.revert(stage).await {
                Ok(()) => println!("{stage} reopened"),
                Err(e) => println!("❌ {e}"),
            },
            ReplCommand::Tts {
                voice,
                rate_percent,
            } => {
                let voice = voice.unwrap_or_else(|| cfg.tts.voice_id.clone());
                let rate = rate_percent.unwrap_or(cfg.tts.rate_percent);
                println!("⏳ synthesizing narration...");
                match session.synthesize_narration(&voice, rate).await {
                    Ok(path) => println!("🔊 {}", path.display()),
                    Err(e) => report("tts", &e),
                }
            }
            ReplCommand::Show => println!("{}", render_state(&session.snapshot().await)),
            ReplCommand::Save => {
                let dir = cfg
                    .export_dir
                    .as_deref()
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                match save_bundle(&session.snapshot().await, &dir) {
                    Ok(path) => println!("💾 saved {}", path.display()),
                    Err(msg) => println!("❌ save: {msg}"),
                }
            }
            ReplCommand::Reset => {
                session.reset().await;
                println!("session reset");
            }
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}
