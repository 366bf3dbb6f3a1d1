//! Snapshot persistence abstraction:
//! one opaque blob, load and save.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("io: {0}")]
  Io(String),
}

#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
  /// Previously saved snapshot, or None
  /// on first run.
  async fn load(
    &self,
  ) -> Result<Option<String>, StoreError>;

  async fn save(
    &self,
    snapshot: &str,
  ) -> Result<(), StoreError>;
}
