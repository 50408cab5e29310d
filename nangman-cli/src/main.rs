mod shorts;

use anyhow::Context;
use chrono::{Local, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use nangman_core::briefing::render_stats;
use nangman_core::news::DEFAULT_RECENT_HOURS;
use nangman_core::types::BriefingFormat;
use nangman_runtime::config_store::{ConfigStore, DEFAULT_CONFIG_FILE};
use nangman_runtime::news_store::NewsStore;
use nangman_runtime::runtime_engine::{
    build_notifier, build_session_from_config, build_telegram_transport, render_notification,
};
use nangman_runtime::secrets::{SecretKey, delete_secret, set_secret};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "nangman", version, about = "Step-gated shorts generation and news briefings")]
struct Cli {
    /// Path to config.json (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive title -> script -> image prompt session.
    Shorts {
        #[arg(long)]
        topic: Option<String>,
    },
    /// Send the collected news briefing to Telegram.
    Notify {
        #[arg(long)]
        news: Option<PathBuf>,
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
        /// Only include items from the last 24 hours.
        #[arg(long)]
        recent: bool,
        /// Only include items published within this many hours.
        #[arg(long, conflicts_with = "recent")]
        since_hours: Option<i64>,
        /// Print the message instead of sending it.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print collection statistics.
    Stats {
        #[arg(long)]
        news: Option<PathBuf>,
        /// Also send the statistics to Telegram.
        #[arg(long)]
        send: bool,
    },
    /// Check the Telegram bot token (getMe).
    Ping,
    /// Maintain the collected news archive.
    News {
        #[command(subcommand)]
        action: NewsAction,
    },
    /// Manage config.json.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Manage API keys in the OS keyring.
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

#[derive(Debug, Subcommand)]
enum NewsAction {
    /// Drop items outside the recency window and rewrite the archive newest first.
    Prune {
        #[arg(long)]
        news: Option<PathBuf>,
        #[arg(long, default_value_t = DEFAULT_RECENT_HOURS)]
        since_hours: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Write a config file with every default filled in.
    Init {
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Simple,
    Category,
}

impl From<FormatArg> for BriefingFormat {
    fn from(f: FormatArg) -> Self {
        match f {
            FormatArg::Simple => BriefingFormat::Simple,
            FormatArg::Category => BriefingFormat::Category,
        }
    }
}

#[derive(Debug, Subcommand)]
enum SecretAction {
    /// Store a secret; the value is read from stdin.
    Set { name: String },
    Clear { name: String },
}

fn parse_secret_name(name: &str) -> anyhow::Result<SecretKey> {
    SecretKey::parse(name)
        .ok_or_else(|| anyhow::anyhow!("unknown secret {name:?} (expected llm, elevenlabs or telegram)"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let store = ConfigStore::at_path(&cli.config);
    // Runs before loading so a broken file can be replaced.
    if let Command::Config {
        action: ConfigAction::Init { force },
    } = &cli.command
    {
        store.init(*force)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }
    let cfg = store.load_or_default()?;

    match cli.command {
        Command::Shorts { topic } => {
            let session = build_session_from_config(&cfg)?;
            shorts::run(session, &cfg, topic).await
        }
        Command::Notify {
            news,
            format,
            recent,
            since_hours,
            dry_run,
        } => {
            let news_path = news.unwrap_or_else(|| PathBuf::from(&cfg.news_path));
            let mut archive = NewsStore::at_path(news_path).load()?;
            let window = since_hours.or(recent.then_some(DEFAULT_RECENT_HOURS));
            if let Some(hours) = window {
                archive.retain_recent(Utc::now(), hours);
            }

            let mut notification = cfg.notification.clone();
            if let Some(f) = format {
                notification.format = f.into();
            }
            let message = render_notification(&notification, &archive.news, &Local::now());

            let notifier = if dry_run { None } else { build_notifier(&cfg)? };
            let Some(notifier) = notifier else {
                if !dry_run {
                    log::warn!("notify: telegram is disabled; printing instead");
                }
                println!("{message}");
                return Ok(());
            };

            let sent = notifier
                .send(&message)
                .await
                .context("send news briefing")?;
            log::info!("notify: delivered {sent} part(s) for {} item(s)", archive.news.len());
            Ok(())
        }
        Command::Stats { news, send } => {
            let news_path = news.unwrap_or_else(|| PathBuf::from(&cfg.news_path));
            let archive = NewsStore::at_path(news_path).load()?;
            let message = render_stats(&archive.news, &Local::now());
            println!("{message}");

            if send {
                let notifier = build_notifier(&cfg)?
                    .ok_or_else(|| anyhow::anyhow!("telegram.enabled is false in config"))?;
                notifier.send(&message).await.context("send statistics")?;
            }
            Ok(())
        }
        Command::Ping => {
            let transport = build_telegram_transport(&cfg)?;
            let me = transport.get_me().await.context("telegram getMe")?;
            println!(
                "bot ok: {} (@{}, id {})",
                me.first_name,
                me.username.as_deref().unwrap_or("-"),
                me.id
            );
            Ok(())
        }
        Command::News {
            action: NewsAction::Prune { news, since_hours },
        } => {
            let news_path = news.unwrap_or_else(|| PathBuf::from(&cfg.news_path));
            let news_store = NewsStore::at_path(news_path);
            let archive = news_store.prune(&Local::now(), since_hours)?;
            println!(
                "kept {} item(s) in {}",
                archive.news.len(),
                news_store.path().display()
            );
            Ok(())
        }
        // Handled before the config is loaded.
        Command::Config { .. } => Ok(()),
        Command::Secret { action } => match action {
            SecretAction::Set { name } => {
                let key = parse_secret_name(&name)?;
                let mut value = String::new();
                std::io::stdin()
                    .read_line(&mut value)
                    .context("read secret from stdin")?;
                let value = value.trim();
                if value.is_empty() {
                    return Err(anyhow::anyhow!("empty secret; nothing stored"));
                }
                set_secret(key, value)?;
                println!("stored {name}");
                Ok(())
            }
            SecretAction::Clear { name } => {
                delete_secret(parse_secret_name(&name)?)?;
                println!("cleared {name}");
                Ok(())
            }
        },
    }
}
