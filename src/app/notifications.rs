//! Transient user-facing message log with auto-expiry.
use std::time::Duration;

use crate::app::context::App;
use crate::domain::model::{Message, MessageKind};
use crate::ports::{
    clock::Clock, fetch::RunsFetcher, random::RandomSource, store::SnapshotStore,
};

const SUCCESS_TTL_MS: u64 = 2_000;
const ERROR_TTL_MS: u64 = 5_000;

#[derive(Debug, Default)]
pub struct NotificationLog {
    next_id: u64,
    entries: Vec<Message>,
}

impl NotificationLog {
    /// Appends an entry and returns its id. Ids increase monotonically and
    /// are never reused.
    pub fn push(&mut self, text: impl Into<String>, kind: MessageKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Message {
            id,
            text: text.into(),
            kind,
        });
        id
    }

    /// Removes by id. Removing an already-gone id is a no-op.
    pub fn clear(&mut self, id: u64) {
        self.entries.retain(|m| m.id != id);
    }

    pub fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub fn ttl_ms(kind: MessageKind) -> u64 {
        match kind {
            MessageKind::Success => SUCCESS_TTL_MS,
            MessageKind::Error => ERROR_TTL_MS,
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
    /// Appends a notification and arms its expiry. While debug mode is on,
    /// expiry is suppressed so entries persist for manual dismissal.
    pub(crate) async fn notify(&self, text: impl Into<String>, kind: MessageKind) {
        let (id, expires) = {
            let mut state = self.inner.state.lock().await;
            let id = state.log.push(text, kind);
            (id, !state.debug)
        };

        if expires {
            let app = self.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(NotificationLog::ttl_ms(kind))).await;
                app.clear_message(id).await;
            });
        }
    }

    pub async fn clear_message(&self, id: u64) {
        self.inner.state.lock().await.log.clear(id);
    }
}
