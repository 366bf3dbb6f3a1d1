//! Per-repository poll timers: exactly one armed timer per repository,
//! re-armed exactly once after every poll attempt.
use std::time::Duration;

use tracing::{debug, warn};

use crate::app::context::App;
use crate::domain::model::MessageKind;
use crate::domain::reconcile::{reconcile, sort_repositories};
use crate::domain::schedule::next_poll_delay_ms;
use crate::infra::time::format_epoch_ms;
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
    /// Cancels any pending timer for `name`, computes the next delay, and
    /// arms one task that sleeps then re-enters `poll`. `poll` ends by
    /// calling back here; that loop is what keeps a repository updating
    /// indefinitely, so every poll path must reach this exactly once.
    // Returns a boxed future (rather than being an `async fn`) to break
    // the `poll` -> `schedule_next` -> spawned `poll` async type cycle.
    pub fn schedule_next<'a>(
        &'a self,
        name: &'a str,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
        let rand01 = self.inner.rng.next_f64().await;
        let now_ms = self.inner.clock.now_epoch_ms().await;

        let delay_ms = {
            let mut state = self.inner.state.lock().await;
            let Some(repository) = state.repositories.iter_mut().find(|r| r.name == name)
            else {
                return;
            };
            let delay_ms = next_poll_delay_ms(repository, now_ms, rand01, &self.inner.cfg.policy);
            repository.next_update_ms = Some(now_ms + delay_ms);
            delay_ms
        };

        // Spawn under the timers lock: the new task cannot touch the map
        // before its handle is registered, even with a zero delay.
        let mut timers = self.inner.timers.lock().await;
        let app = self.clone();
        let task_name = name.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(delay_ms.max(0) as u64)).await;
            // Detach our own handle first, so the reschedule at the end of
            // this poll never aborts the task that is running it.
            app.inner.timers.lock().await.remove(&task_name);
            app.poll(&task_name).await;
        });
        if let Some(stale) = timers.insert(name.to_string(), handle) {
            stale.abort();
        }
        drop(timers);
        debug!(
            repository = name,
            delay_ms,
            fire_at = %format_epoch_ms(now_ms + delay_ms, &self.inner.cfg.timezone),
            "armed next poll"
        );
        })
    }

    pub(crate) async fn cancel_timer(&self, name: &str) {
        if let Some(handle) = self.inner.timers.lock().await.remove(name) {
            handle.abort();
        }
    }

    /// One poll attempt. The membership guard runs unconditionally: a timer
    /// firing for a repository that was removed in the meantime is an
    /// expected race, not an error. Success or failure, the attempt ends by
    /// re-sorting, persisting, and rescheduling.
    pub async fn poll(&self, name: &str) {
        {
            let now_ms = self.inner.clock.now_epoch_ms().await;
            let mut state = self.inner.state.lock().await;
            let Some(repository) = state.repositories.iter_mut().find(|r| r.name == name)
            else {
                return;
            };
            repository.last_attempt_ms = Some(now_ms);
        }

        let outcome = self.inner.fetcher.fetch_runs(name).await;
        let now_ms = self.inner.clock.now_epoch_ms().await;

        let failure = {
            let mut state = self.inner.state.lock().await;
            let Some(repository) = state.repositories.iter_mut().find(|r| r.name == name)
            else {
                // Removed while the fetch was in flight; discard the result.
                return;
            };

            let failure = match outcome {
                Ok(runs) => {
                    if reconcile(repository, &runs, now_ms) {
                        debug!(repository = name, "applied fresh run snapshot");
                    } else {
                        debug!(repository = name, "no push-triggered run in response");
                    }
                    None
                }
                Err(e) => {
                    warn!(repository = name, error = %e, "poll failed");
                    Some(format!("updating repository {name} failed: {e}"))
                }
            };

            sort_repositories(&mut state.repositories);
            self.persist(&state).await;
            failure
        };

        if let Some(text) = failure {
            self.notify(text, MessageKind::Error).await;
        }

        self.schedule_next(name).await;
    }
}
