//! Reqwest-backed `RunsFetcher` against the GitHub Actions API; decodes the
//! workflow-runs payload into domain `RunRecord`s.
use chrono::DateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::model::RunRecord;
use crate::ports::fetch::{FetchError, RunsFetcher};

pub struct GithubHttp {
    client: reqwest::Client,
    api_base: String,
}

impl GithubHttp {
    pub fn new(api_base: String, user_agent: String) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .pool_idle_timeout(std::time::Duration::from_secs(120))
            .timeout(std::time::Duration::from_secs(30))
            .build()?;
        Ok(Self { client, api_base })
    }
}

#[derive(Debug, Deserialize)]
struct RunsPage {
    #[serde(default)]
    workflow_runs: Vec<RawRun>,
}

#[derive(Debug, Deserialize)]
struct RawRun {
    #[serde(default)]
    event: String,
    status: Option<String>,
    conclusion: Option<String>,
    head_branch: Option<String>,
    head_commit: Option<RawCommit>,
    actor: Option<RawActor>,
    created_at: Option<String>,
    run_started_at: Option<String>,
    updated_at: Option<String>,
    id: Option<u64>,
    run_number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    id: Option<String>,
    message: Option<String>,
    timestamp: Option<String>,
    author: Option<RawAuthor>,
}

#[derive(Debug, Deserialize)]
struct RawAuthor {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawActor {
    login: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
}

fn parse_ts(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| DateTime::parse_from_rfc3339(v).ok())
        .map(|dt| dt.timestamp_millis())
}

impl From<RawRun> for RunRecord {
    fn from(raw: RawRun) -> Self {
        let commit = raw.head_commit;
        let actor = raw.actor;
        RunRecord {
            event: raw.event,
            status: raw.status,
            conclusion: raw.conclusion,
            head_branch: raw.head_branch,
            commit_hash: commit.as_ref().and_then(|c| c.id.clone()),
            commit_message: commit.as_ref().and_then(|c| c.message.clone()),
            commit_date_ms: parse_ts(commit.as_ref().and_then(|c| c.timestamp.as_deref())),
            commit_author: commit
                .as_ref()
                .and_then(|c| c.author.as_ref())
                .and_then(|a| a.name.clone()),
            actor_login: actor.as_ref().and_then(|a| a.login.clone()),
            actor_kind: actor.as_ref().and_then(|a| a.kind.clone()),
            created_ms: parse_ts(raw.created_at.as_deref()),
            started_ms: parse_ts(raw.run_started_at.as_deref()),
            updated_ms: parse_ts(raw.updated_at.as_deref()),
            run_id: raw.id,
            run_number: raw.run_number,
        }
    }
}

#[async_trait::async_trait]
impl RunsFetcher for GithubHttp {
    async fn fetch_runs(&self, repository: &str) -> Result<Vec<RunRecord>, FetchError> {
        let url = format!(
            "{}/repos/{}/actions/runs?exclude_pull_requests=1",
            self.api_base, repository
        );
        debug!(%url, "fetching workflow runs");

        let response = self
            .client
            .get(&url)
            .header("accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
        {
            debug!(repository, remaining, "rate limit remaining");
        }

        let status = response.status();
        if !status.is_success() {
            warn!(repository, status = status.as_u16(), "runs request failed");
            return Err(FetchError::Status(status.as_u16()));
        }

        let page: RunsPage = response
            .json()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))?;
        Ok(page.workflow_runs.into_iter().map(RunRecord::from).collect())
    }
}
