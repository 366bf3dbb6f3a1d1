use std::path::PathBuf;

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::schedule::PollPolicy;

/// Normalized outcome of the most recent push-triggered workflow run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    Unknown,
    Success,
    Failure,
    InProgress,
}

/// Snapshot of the most recent push-triggered run of a repository.
/// Replaced wholesale on every successful poll that yields a push run,
/// never patched field by field.
///
/// All timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub branch: Option<String>,
    pub commit_hash: Option<String>,
    /// First line of the commit message only.
    pub commit_message: Option<String>,
    pub commit_date_ms: Option<i64>,
    pub commit_author: Option<String>,
    /// Actor login, present only when the actor is a human account.
    pub user: Option<String>,
    pub run_created_ms: Option<i64>,
    pub run_started_ms: Option<i64>,
    pub run_updated_ms: Option<i64>,
    pub run_id: Option<u64>,
    pub run_number: Option<u64>,
    pub status: BuildStatus,
}

/// A tracked repository, keyed by its `owner/repo` name.
///
/// `last_attempt_ms` records every poll attempt; `last_updated_ms` only the
/// application of a fresh snapshot. The two are kept separate: the former
/// detects never-polled repositories, the latter anchors the poll cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    #[serde(default)]
    pub status: Option<RunSnapshot>,
    #[serde(default)]
    pub last_attempt_ms: Option<i64>,
    #[serde(default)]
    pub last_updated_ms: Option<i64>,
    /// When the armed timer will fire. Informational; never serialized,
    /// since timers are always re-armed after a reload.
    #[serde(skip)]
    pub next_update_ms: Option<i64>,
}

impl Repository {
    pub fn new(name: String) -> Self {
        Self {
            name,
            status: None,
            last_attempt_ms: None,
            last_updated_ms: None,
            next_update_ms: None,
        }
    }
}

/// Raw upstream run record as handed across the fetch port, already decoded
/// from the wire format. Field shapes follow the workflow-run payload.
#[derive(Debug, Clone, Default)]
pub struct RunRecord {
    /// Trigger event name, e.g. "push" or "pull_request".
    pub event: String,
    pub status: Option<String>,
    pub conclusion: Option<String>,
    pub head_branch: Option<String>,
    pub commit_hash: Option<String>,
    pub commit_message: Option<String>,
    pub commit_date_ms: Option<i64>,
    pub commit_author: Option<String>,
    pub actor_login: Option<String>,
    /// Actor account type, e.g. "User", "Bot", "Organization".
    pub actor_kind: Option<String>,
    pub created_ms: Option<i64>,
    pub started_ms: Option<i64>,
    pub updated_ms: Option<i64>,
    pub run_id: Option<u64>,
    pub run_number: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// One user-facing notification entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: u64,
    pub text: String,
    pub kind: MessageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub state_path: PathBuf,
    pub api_base: String,
    pub user_agent: String,
    pub log_level: String,
    pub mode: AppMode,
    pub timezone: Tz,
    pub policy: PollPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("res/state.json"),
            api_base: "https://api.github.com".to_string(),
            user_agent: concat!("buildwatch/", env!("CARGO_PKG_VERSION")).to_string(),
            log_level: "info".to_string(),
            mode: AppMode::Prod,
            timezone: chrono_tz::UTC,
            policy: PollPolicy::default(),
        }
    }
}
