mod config;
mod infrastructure;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use diange_config::config_backend;
use diange_core::domain::element::plain_text;
use diange_core::ports::ChatSession;
use diange_core::services::dialog::is_command;
use diange_core::services::{CatalogService, DialogService};
use diange_http::ReqwestHttpClient;

use crate::config::AppConfig;
use crate::infrastructure::ConsoleSession;

/// Search QQ Music and NetEase, pick a song, get it as voice.
#[derive(Debug, Parser)]
#[command(name = "diange", version)]
struct Cli {
  /// Search keywords. A leading `music`, `mdff` or `点歌` is accepted and ignored.
  #[arg(trailing_var_arg = true)]
  keyword: Vec<String>,
}

impl Cli {
  fn keyword(&self) -> Option<String> {
    let words = match self.keyword.split_first() {
      Some((first, rest)) if is_command(first) => rest,
      _ => &self.keyword[..],
    };
    let joined = words.join(" ");
    (!joined.trim().is_empty()).then_some(joined)
  }
}

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();
}

/// Entry point of the `diange` binary.
pub fn run() -> ExitCode {
  let cli = Cli::parse();
  init_tracing();

  let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
    Ok(rt) => rt,
    Err(err) => {
      error!(error = %err, "could not start async runtime");
      return ExitCode::FAILURE;
    }
  };

  match runtime.block_on(invoke(cli)) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      error!("{err:#}");
      eprintln!("点歌失败: {err:#}");
      ExitCode::FAILURE
    }
  }
}

async fn invoke(cli: Cli) -> anyhow::Result<()> {
  // --- Dependency Injection Phase ---

  // 1. Configuration (TOML, platform paths or DIANGE_BASE_DIR)
  let backend = config_backend()?;
  let cfg = AppConfig::load_from(&backend).context("loading diange.toml")?;

  // 2. HTTP adapter (reqwest) behind the catalog service
  let http = ReqwestHttpClient::new(&cfg.http)?;
  let catalog = CatalogService::new(http, cfg.catalog.clone());

  // 3. No page renderer ships with the console build; image_mode reports that at send time.
  let dialog = DialogService::new(catalog, None, cfg.dialog.clone())?;

  // 4. Chat session over stdin/stdout
  let session = ConsoleSession::new(
    BufReader::new(tokio::io::stdin()),
    tokio::io::stdout(),
    backend.paths().cache_dir.clone(),
  );

  let keyword = cli.keyword();
  if let Some(reply) = dialog.run(&session, keyword.as_deref()).await? {
    debug!(reply = %plain_text(&reply), "final reply");
    session.send(reply).await?;
  }

  Ok(())
}
