//! `boltcall-server`: serves the assistant registry API.
//!
//! ```text
//! boltcall-server --config /etc/boltcall/config.toml
//! boltcall-server --hash-password      # prints a PHC string for auth_password_hash
//! ```

use std::{io::BufRead as _, path::PathBuf};

use anyhow::Context as _;
use boltcall_server::{AppState, ServerConfig, auth};
use boltcall_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Boltcall assistant registry server")]
struct Cli {
  /// TOML settings file; missing is fine, `BOLTCALL_*` variables still apply.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash, and exit.
  #[arg(long)]
  hash_password: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  if cli.hash_password {
    eprint!("Password: ");
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    println!("{}", auth::hash_password(line.trim_end_matches(['\r', '\n']))?);
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("loading settings ({})", cli.config.display()))?;
  let store_path = cfg.resolved_store_path();
  tracing::info!(
    file = %cli.config.display(),
    host = %cfg.host,
    port = cfg.port,
    store = %store_path.display(),
    user = %cfg.auth_username,
    "settings resolved"
  );

  if let Some(dir) = store_path.parent().filter(|d| !d.as_os_str().is_empty()) {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("opening store {}", store_path.display()))?;

  let app = boltcall_server::router(AppState::new(store, auth::AuthConfig::from(&cfg)));
  let listener = TcpListener::bind(cfg.bind_address())
    .await
    .with_context(|| format!("binding {}", cfg.bind_address()))?;
  tracing::info!(address = %listener.local_addr()?, "listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(async {
      tokio::signal::ctrl_c().await.ok();
      tracing::info!("shutting down");
    })
    .await
    .context("server error")
}
