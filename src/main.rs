use std::path::PathBuf;
use std::time::Duration;

use buildwatch::app::context::App;
use buildwatch::domain::model::AppMode;
use buildwatch::infra::{
  config::ConfigLoader,
  file_store::FileStore,
  github_http::GithubHttp,
  logging::{init_logging, BootError},
  random::MutexRng,
  system_clock::SystemClock,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), BootError> {
  let cfg_path = pick_config_path(std::env::args().nth(1));
  let cfg = ConfigLoader::load(&cfg_path)
    .await
    .map_err(|e| BootError::Fatal(e.to_string()))?;
  init_logging(&cfg.log_level);

  info!(
    timezone = %cfg.timezone,
    state_path = %cfg.state_path.display(),
    mode = ?cfg.mode,
    "Loaded config"
  );

  if matches!(cfg.mode, AppMode::Dev) {
    warn!(state_path = %cfg.state_path.display(), "Dev mode enabled, deleting state");
    let _ = tokio::fs::remove_file(&cfg.state_path).await;
  }

  let fetcher = GithubHttp::new(cfg.api_base.clone(), cfg.user_agent.clone())
    .map_err(|e| BootError::Fatal(e.to_string()))?;
  let store = FileStore::new(cfg.state_path.clone());
  let app = App::new(cfg, fetcher, store, SystemClock::default(), MutexRng::new());

  app.start().await;

  // Any further arguments are repository names to start tracking.
  let names: Vec<String> = std::env::args().skip(2).collect();
  if !names.is_empty() {
    app.add_repositories(&names.join(" ")).await;
  }

  let reporter = app.clone();
  tokio::spawn(async move {
    report_loop(reporter).await;
  });

  tokio::signal::ctrl_c()
    .await
    .map_err(|e| BootError::Fatal(e.to_string()))?;
  info!("Shutting down");
  Ok(())
}

async fn report_loop<F, S, C, G>(app: App<F, S, C, G>)
where
  F: buildwatch::ports::fetch::RunsFetcher + 'static,
  S: buildwatch::ports::store::SnapshotStore + 'static,
  C: buildwatch::ports::clock::Clock + 'static,
  G: buildwatch::ports::random::RandomSource + 'static,
{
  let mut interval = tokio::time::interval(Duration::from_secs(60));
  loop {
    interval.tick().await;
    for row in app.overview().await {
      match &row.status {
        Some(status) => info!(
          repository = %row.name,
          status = ?status.status,
          branch = status.branch.as_deref().unwrap_or("-"),
          run_age = row.run_age.as_deref().unwrap_or("-"),
          duration = row.run_duration.as_deref().unwrap_or("-"),
          "Status"
        ),
        None => info!(repository = %row.name, "No status yet"),
      }
    }
    for message in app.messages().await {
      info!(id = message.id, kind = ?message.kind, text = %message.text, "Notification");
    }
  }
}

fn pick_config_path(arg1: Option<String>) -> PathBuf {
  if let Some(p) = arg1 {
    return PathBuf::from(p);
  }
  PathBuf::from("res/config.toml")
}
