//! Application context: config, ports, shared registry, snapshot restore.
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::app::notifications::NotificationLog;
use crate::domain::model::{AppConfig, MessageKind, Repository};
use crate::ports::{
    clock::Clock, fetch::RunsFetcher, random::RandomSource, store::SnapshotStore,
};

/// Registry plus everything mutated alongside it. Guarded by a single lock;
/// the fetch await never happens while it is held.
pub struct AppState {
    pub repositories: Vec<Repository>,
    pub log: NotificationLog,
    pub debug: bool,
}

pub(crate) struct Inner<F, S, C, G>
where
    F: RunsFetcher,
    S: SnapshotStore,
    C: Clock,
    G: RandomSource,
{
    pub(crate) cfg: AppConfig,
    pub(crate) fetcher: F,
    pub(crate) store: S,
    pub(crate) clock: C,
    pub(crate) rng: G,
    pub(crate) state: Mutex<AppState>,
    /// Pending timer per repository name. Lock order: `state` before
    /// `timers`, never the other way around.
    pub(crate) timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

/// The status tracker. Cheap to clone; clones share the same state, which is
/// what lets armed timer tasks re-enter `poll`.
pub struct App<F, S, C, G>
where
    F: RunsFetcher,
    S: SnapshotStore,
    C: Clock,
    G: RandomSource,
{
    pub(crate) inner: Arc<Inner<F, S, C, G>>,
}

impl<F, S, C, G> Clone for App<F, S, C, G>
where
    F: RunsFetcher,
    S: SnapshotStore,
    C: Clock,
    G: RandomSource,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<F, S, C, G> App<F, S, C, G>
where
    F: RunsFetcher + 'static,
    S: SnapshotStore + 'static,
    C: Clock + 'static,
    G: RandomSource + 'static,
{
    pub fn new(cfg: AppConfig, fetcher: F, store: S, clock: C, rng: G) -> Self {
        Self {
            inner: Arc::new(Inner {
                cfg,
                fetcher,
                store,
                clock,
                rng,
                state: Mutex::new(AppState {
                    repositories: Vec::new(),
                    log: NotificationLog::default(),
                    debug: false,
                }),
                timers: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Restores the persisted snapshot, then arms a timer for every tracked
    /// repository. Persistence failures are reported, never fatal.
    pub async fn start(&self) {
        match self.inner.store.load().await {
            Ok(Some(blob)) => self.restore(&blob).await,
            Ok(None) => info!("no snapshot found, starting empty"),
            Err(e) => {
                warn!(error = %e, "failed to read snapshot");
                self.notify("loading repositories failed", MessageKind::Error)
                    .await;
            }
        }

        let names: Vec<String> = {
            let state = self.inner.state.lock().await;
            state.repositories.iter().map(|r| r.name.clone()).collect()
        };
        for name in &names {
            self.schedule_next(name).await;
        }
    }

    /// Tolerant snapshot restore: entries that fail to decode, lack a name,
    /// or duplicate an earlier name are dropped; the rest survive. Records
    /// from older schema versions decode with absent optional fields.
    async fn restore(&self, blob: &str) {
        let entries: Vec<serde_json::Value> = match serde_json::from_str(blob) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "snapshot is not a valid repository list");
                self.notify("loading repositories failed", MessageKind::Error)
                    .await;
                return;
            }
        };

        let mut dropped = 0usize;
        let loaded = {
            let mut state = self.inner.state.lock().await;
            for entry in entries {
                match serde_json::from_value::<Repository>(entry) {
                    Ok(repository) if !repository.name.is_empty() => {
                        if state.repositories.iter().any(|r| r.name == repository.name) {
                            dropped += 1;
                            continue;
                        }
                        state.repositories.push(repository);
                    }
                    _ => dropped += 1,
                }
            }
            state.repositories.len()
        };

        if dropped > 0 {
            warn!(loaded, dropped, "snapshot restored partially");
            let text = if loaded > 0 {
                "loading some repositories failed"
            } else {
                "loading repositories failed"
            };
            self.notify(text, MessageKind::Error).await;
        } else {
            info!(loaded, "snapshot restored");
        }
    }

    /// Writes the registry snapshot through the store port. Called after
    /// every structural or status mutation, with the state lock held so the
    /// saved blob matches what the caller just changed.
    pub(crate) async fn persist(&self, state: &AppState) {
        let blob = match serde_json::to_string(&state.repositories) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "failed to encode snapshot");
                return;
            }
        };
        if let Err(e) = self.inner.store.save(&blob).await {
            warn!(error = %e, "failed to persist snapshot");
        }
    }
}
