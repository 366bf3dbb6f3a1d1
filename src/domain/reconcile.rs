//! Merges a fetch result into a repository and orders the registry.
use std::cmp::Reverse;

use crate::domain::classify::classify;
use crate::domain::model::{Repository, RunRecord, RunSnapshot};

/// Applies a fetch result to a repository. Picks the first push-triggered
/// run in upstream order and skips everything else. Returns `true` when a
/// fresh snapshot was applied; with no push run the existing status is left
/// untouched (stale-but-present beats absent).
pub fn reconcile(repository: &mut Repository, runs: &[RunRecord], now_ms: i64) -> bool {
    let Some(run) = runs.iter().find(|r| r.event == "push") else {
        return false;
    };

    let user = match run.actor_kind.as_deref() {
        Some("User") => run.actor_login.clone(),
        _ => None,
    };

    repository.status = Some(RunSnapshot {
        branch: run.head_branch.clone(),
        commit_hash: run.commit_hash.clone(),
        commit_message: run.commit_message.as_deref().map(first_line),
        commit_date_ms: run.commit_date_ms,
        commit_author: run.commit_author.clone(),
        user,
        run_created_ms: run.created_ms,
        run_started_ms: run.started_ms,
        run_updated_ms: run.updated_ms,
        run_id: run.run_id,
        run_number: run.run_number,
        status: classify(run.status.as_deref(), run.conclusion.as_deref()),
    });
    repository.last_updated_ms = Some(now_ms);
    true
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}

/// Derived ordering timestamp: run update time, else start time, else
/// creation time; repositories that have never reported a run get epoch zero.
pub fn sort_key(repository: &Repository) -> i64 {
    repository
        .status
        .as_ref()
        .and_then(|s| {
            s.run_updated_ms
                .or(s.run_started_ms)
                .or(s.run_created_ms)
        })
        .unwrap_or(0)
}

/// Most recently updated first. The sort is stable, so statusless
/// repositories sink to the bottom in their relative insertion order.
pub fn sort_repositories(repositories: &mut [Repository]) {
    repositories.sort_by_key(|r| Reverse(sort_key(r)));
}
