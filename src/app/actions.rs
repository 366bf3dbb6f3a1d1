//! User-facing operations: add, remove, manual update, debug toggle.
use tracing::info;

use crate::app::context::App;
use crate::domain::model::{MessageKind, Repository};
use crate::ports::{
    clock::Clock, fetch::RunsFetcher, random::RandomSource, store::SnapshotStore,
};

impl<F, S, C, G> App<F, S, C, G>
where
    F: RunsFetcher + 'static,
    S: SnapshotStore + 'static,
    C: Clock + 'static,
    G: RandomSource + 'static,
{
    /// Splits a raw multi-name input on whitespace and tracks each name.
    /// Duplicates are rejected one by one without aborting the rest of the
    /// batch. Every new repository is persisted and polled immediately.
    pub async fn add_repositories(&self, raw: &str) {
        for name in raw.split_whitespace() {
            let added = {
                let mut state = self.inner.state.lock().await;
                if state.repositories.iter().any(|r| r.name == name) {
                    false
                } else {
                    state.repositories.push(Repository::new(name.to_string()));
                    self.persist(&state).await;
                    true
                }
            };

            if added {
                info!(repository = name, "tracking repository");
                self.notify(format!("repository {name} added"), MessageKind::Success)
                    .await;
                self.schedule_next(name).await;
            } else {
                self.notify(
                    format!("repository {name} already exists"),
                    MessageKind::Error,
                )
                .await;
            }
        }
    }

    /// Cancels the pending timer and drops the entry. An in-flight fetch for
    /// the repository is left to finish; its result is discarded by the
    /// membership guard in `poll`.
    pub async fn remove_repository(&self, name: &str) {
        self.cancel_timer(name).await;

        let removed = {
            let mut state = self.inner.state.lock().await;
            let before = state.repositories.len();
            state.repositories.retain(|r| r.name != name);
            if state.repositories.len() < before {
                self.persist(&state).await;
                true
            } else {
                false
            }
        };

        if removed {
            info!(repository = name, "stopped tracking repository");
            self.notify(format!("repository {name} removed"), MessageKind::Success)
                .await;
        }
    }

    /// Polls right now instead of waiting for the armed timer. The poll
    /// reschedules as usual, replacing the pending timer.
    pub async fn trigger_manual_update(&self, name: &str) {
        self.cancel_timer(name).await;
        self.poll(name).await;
    }

    /// Flips debug mode and returns the new value. While on, notifications
    /// stop auto-expiring.
    pub async fn toggle_debug(&self) -> bool {
        let mut state = self.inner.state.lock().await;
        state.debug = !state.debug;
        state.debug
    }
}
