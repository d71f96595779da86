//! `boltcall` — management client for the Boltcall assistant registry.
//!
//! Without a subcommand it opens the terminal UI for one workspace; the
//! subcommands print JSON and exit.
//!
//! # Usage
//!
//! ```text
//! boltcall --url http://localhost:8080 --user admin --password secret --workspace ws_1
//! boltcall --config ~/.config/boltcall/config.toml create "Front Desk" dentist
//! boltcall search --text dental --industry dentist
//! ```

mod app;
mod client;
mod ui;
mod ui_state;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result, anyhow};
use app::App;
use boltcall_core::{
  assistant::Tone,
  factory::{IndustryContextPatch, LlmConfigPatch},
  store::ConfigQuery,
};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, NewConfigRequest};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use ui_state::UiState;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "boltcall", about = "Manage Boltcall voice-assistant configurations")]
struct Args {
  /// Path to a TOML config file (url, username, password, workspace_id, user_id).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the boltcall server (default: http://localhost:8080).
  #[arg(long, env = "BOLTCALL_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "BOLTCALL_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "BOLTCALL_PASSWORD")]
  password: Option<String>,

  /// Workspace to manage.
  #[arg(long, env = "BOLTCALL_WORKSPACE")]
  workspace: Option<String>,

  /// Owner id recorded on new assistants.
  #[arg(long = "as-user", env = "BOLTCALL_USER_ID")]
  user_id: Option<String>,

  /// Where TUI preferences are stored (default: ~/.config/boltcall/ui.toml).
  #[arg(long, value_name = "FILE")]
  ui_state: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List active assistants in the workspace; `--mine` lists those owned by `--as-user`.
  List {
    #[arg(long)]
    mine: bool,
  },
  /// Public assistants for an industry, most used first.
  Public { industry: String },
  /// Show one assistant.
  Show { id: Uuid },
  /// Create an assistant from the industry preset.
  Create {
    name:     String,
    industry: String,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    voice: Option<String>,
    /// Caller-facing tone: professional, friendly, casual or formal.
    #[arg(long, value_parser = Tone::parse)]
    tone: Option<Tone>,
    /// JSON object deep-merged over the preset's LLM configuration.
    #[arg(long, value_name = "JSON")]
    overrides: Option<String>,
  },
  /// Make an assistant public or private.
  Publish {
    id: Uuid,
    #[arg(long)]
    private: bool,
  },
  /// Record one use of an assistant.
  Use { id: Uuid },
  /// Soft-delete an assistant.
  Delete { id: Uuid },
  /// Search the caller's and public assistants.
  Search {
    #[arg(long)]
    text: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    limit: Option<usize>,
    #[arg(long)]
    offset: Option<usize>,
  },
  /// Industries in use.
  Industries,
  /// Built-in presets, or one preset in full.
  Presets { industry: Option<String> },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:          String,
  #[serde(default)]
  username:     String,
  #[serde(default)]
  password:     String,
  #[serde(default)]
  workspace_id: String,
  #[serde(default)]
  user_id:      String,
}

/// Flag (or env var), else non-empty file value.
fn pick(flag: Option<String>, file: &str) -> Option<String> {
  flag.or_else(|| (!file.is_empty()).then(|| file.to_string()))
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let api_config = ApiConfig {
    base_url: pick(args.url, &file_cfg.url)
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: pick(args.user, &file_cfg.username).unwrap_or_default(),
    password: pick(args.password, &file_cfg.password).unwrap_or_default(),
  };
  let workspace_id = pick(args.workspace, &file_cfg.workspace_id);
  let user_id = pick(args.user_id, &file_cfg.user_id);

  let client = ApiClient::new(api_config)?;

  match args.command {
    Some(command) => {
      tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
          EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy(),
        )
        .init();
      run_command(&client, command, workspace_id, user_id).await
    }
    None => {
      let workspace_id = workspace_id.context("--workspace is required for the TUI")?;
      let ui_path = args.ui_state.or_else(UiState::default_path);
      let ui = match &ui_path {
        Some(path) => UiState::load(path)?,
        None => UiState::default(),
      };
      let app = App::new(client, workspace_id, user_id.unwrap_or_default(), ui, ui_path);
      run_tui(app).await
    }
  }
}

// ─── One-shot commands ────────────────────────────────────────────────────────

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

async fn run_command(
  client: &ApiClient,
  command: Command,
  workspace_id: Option<String>,
  user_id: Option<String>,
) -> Result<()> {
  let need_workspace = || workspace_id.clone().context("--workspace is required");
  let need_user = || user_id.clone().context("--as-user is required");

  match command {
    Command::List { mine: true } => print_json(&client.list_user(&need_user()?).await?),
    Command::List { mine: false } => print_json(&client.list_workspace(&need_workspace()?).await?),
    Command::Public { industry } => print_json(&client.list_public(&industry).await?),
    Command::Show { id } => {
      let config = client
        .get(id)
        .await?
        .ok_or_else(|| anyhow!("assistant {id} not found"))?;
      print_json(&config)
    }
    Command::Create { name, industry, description, voice, tone, overrides } => {
      let overrides: Option<LlmConfigPatch> = overrides
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .context("parsing --overrides")?;
      let overrides = with_tone(overrides, tone);
      let request = NewConfigRequest {
        name,
        industry,
        workspace_id: need_workspace()?,
        user_id: need_user()?,
        description,
        voice_id: voice,
        overrides,
      };
      print_json(&client.create(&request).await?)
    }
    Command::Publish { id, private } => {
      let patch = boltcall_core::store::ConfigPatch {
        is_public: Some(!private),
        ..Default::default()
      };
      print_json(&client.update(id, &patch).await?)
    }
    Command::Use { id } => {
      let usage_count = client.record_usage(id).await?;
      print_json(&serde_json::json!({ "usage_count": usage_count }))
    }
    Command::Delete { id } => {
      client.delete(id).await?;
      tracing::info!(%id, "deleted");
      Ok(())
    }
    Command::Search { text, industry, limit, offset } => {
      let query = ConfigQuery { text, user_id: user_id.clone(), industry, limit, offset };
      print_json(&client.search(&query).await?)
    }
    Command::Industries => print_json(&client.industries().await?),
    Command::Presets { industry: None } => print_json(&client.presets().await?),
    Command::Presets { industry: Some(industry) } => print_json(&client.preset(&industry).await?),
  }
}

/// `--tone` wins over a tone given inside `--overrides`; the rest of the
/// overrides are untouched.
fn with_tone(overrides: Option<LlmConfigPatch>, tone: Option<Tone>) -> Option<LlmConfigPatch> {
  let Some(tone) = tone else { return overrides };
  let mut overrides = overrides.unwrap_or_default();
  overrides
    .industry_context
    .get_or_insert_with(IndustryContextPatch::default)
    .tone = Some(tone);
  Some(overrides)
}

// ─── TUI ──────────────────────────────────────────────────────────────────────

async fn run_tui(mut app: App) -> Result<()> {
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let load_result = app.reload().await;

  let run_result = if load_result.is_ok() {
    run_event_loop(&mut terminal, &mut app).await
  } else {
    load_result
  };

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn create_accepts_known_tone() {
    let args =
      Args::try_parse_from(["boltcall", "create", "Desk", "dentist", "--tone", "friendly"])
        .unwrap();
    let Some(Command::Create { tone, .. }) = args.command else {
      panic!("expected create, got {:?}", args.command);
    };
    assert_eq!(tone, Some(Tone::Friendly));
  }

  #[test]
  fn create_rejects_unknown_tone() {
    let err = Args::try_parse_from(["boltcall", "create", "Desk", "dentist", "--tone", "grumpy"])
      .unwrap_err();
    assert!(err.to_string().contains("unknown tone"), "{err}");
  }

  #[test]
  fn tone_merges_into_overrides() {
    let overrides: LlmConfigPatch = serde_json::from_str(
      r#"{"temperature": 0.2, "industry_context": {"language": "fr-FR", "tone": "casual"}}"#,
    )
    .unwrap();

    let merged = with_tone(Some(overrides), Some(Tone::Formal)).unwrap();
    assert_eq!(merged.temperature, Some(0.2));
    let ctx = merged.industry_context.unwrap();
    assert_eq!(ctx.tone, Some(Tone::Formal));
    assert_eq!(ctx.language.as_deref(), Some("fr-FR"));

    assert_eq!(with_tone(None, None), None);
    let only_tone = with_tone(None, Some(Tone::Casual)).unwrap();
    assert_eq!(only_tone.industry_context.unwrap().tone, Some(Tone::Casual));
  }
}
