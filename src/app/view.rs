//! Presentation boundary: plain data rows for whatever renders them.
use serde::Serialize;

use crate::app::context::App;
use crate::domain::model::{Message, Repository, RunSnapshot};
use crate::infra::time::{format_age, format_duration};
use crate::ports::{
    clock::Clock, fetch::RunsFetcher, random::RandomSource, store::SnapshotStore,
};

/// One repository as the presentation layer sees it: every tracked field
/// plus human-readable relative ages and the run duration.
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryView {
    pub name: String,
    pub status: Option<RunSnapshot>,
    pub commit_age: Option<String>,
    pub run_age: Option<String>,
    pub run_duration: Option<String>,
    pub last_attempt_ms: Option<i64>,
    pub last_updated_ms: Option<i64>,
    pub next_update_ms: Option<i64>,
}

impl<F, S, C, G> App<F, S, C, G>
where
    F: RunsFetcher + 'static,
    S: SnapshotStore + 'static,
    C: Clock + 'static,
    G: RandomSource + 'static,
{
    /// Ordered rows, freshest repository first (the registry is re-sorted on
    /// every reconciliation).
    pub async fn overview(&self) -> Vec<RepositoryView> {
        let now_ms = self.inner.clock.now_epoch_ms().await;
        let state = self.inner.state.lock().await;
        state
            .repositories
            .iter()
            .map(|r| view_of(r, now_ms))
            .collect()
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().await.log.entries().to_vec()
    }

    pub async fn debug_enabled(&self) -> bool {
        self.inner.state.lock().await.debug
    }
}

fn view_of(repository: &Repository, now_ms: i64) -> RepositoryView {
    let status = repository.status.clone();
    let commit_age = status
        .as_ref()
        .and_then(|s| s.commit_date_ms)
        .map(|ts| format_age(now_ms, ts));
    let run_age = status
        .as_ref()
        .and_then(|s| s.run_updated_ms)
        .map(|ts| format_age(now_ms, ts));
    let run_duration = status.as_ref().and_then(|s| {
        let finished = s.run_updated_ms?;
        let begun = s.run_started_ms.or(s.run_created_ms)?;
        Some(format_duration(finished - begun))
    });

    RepositoryView {
        name: repository.name.clone(),
        status,
        commit_age,
        run_age,
        run_duration,
        last_attempt_ms: repository.last_attempt_ms,
        last_updated_ms: repository.last_updated_ms,
        next_update_ms: repository.next_update_ms,
    }
}
