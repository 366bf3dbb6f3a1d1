//! Fetch abstraction returning the
//! latest workflow runs of a repository.

use thiserror::Error;

use crate::domain::model::RunRecord;

#[derive(Debug, Error)]
pub enum FetchError {
  #[error("http status {0}")]
  Status(u16),
  #[error("transport: {0}")]
  Transport(String),
  #[error("decode: {0}")]
  Decode(String),
}

#[async_trait::async_trait]
pub trait RunsFetcher: Send + Sync {
  /// Runs in upstream order, newest first.
  /// The caller must tolerate many
  /// near-simultaneous calls for different
  /// repositories.
  async fn fetch_runs(
    &self,
    repository: &str,
  ) -> Result<Vec<RunRecord>, FetchError>;
}
