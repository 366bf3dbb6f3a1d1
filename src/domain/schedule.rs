//! Poll cadence rules for a tracked repository.
use crate::domain::model::{BuildStatus, Repository};

/// Cadences in milliseconds; defaults follow the upstream API's caching
/// behavior (responses are cached for about a minute, so polling a build in
/// flight faster than that buys nothing).
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// A run is in flight.
    pub inprogress_ms: i64,
    /// Last run finished within the recency window.
    pub active_ms: i64,
    /// Everything else; jittered to spread repositories added together.
    pub idle_ms: i64,
    pub active_window_ms: i64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            inprogress_ms: 60 * 1000,
            active_ms: 5 * 60 * 1000,
            idle_ms: 60 * 60 * 1000,
            active_window_ms: 7 * 24 * 60 * 60 * 1000,
        }
    }
}

/// Computes the delay before the next poll, in milliseconds.
///
/// Precedence, first match wins: never-attempted repositories fire
/// immediately; in-flight builds poll at the fast cadence; repositories with
/// a run update inside the recency window poll at the active cadence;
/// everything else polls at the idle cadence scaled by a factor in
/// [0.9, 1.0] so a batch of repositories added together does not keep firing
/// in lockstep.
///
/// A late-correction step then subtracts the time already elapsed since the
/// last successful update, floored at zero, anchoring the cadence to the
/// last applied change rather than to whenever the previous poll happened
/// to run.
pub fn next_poll_delay_ms(
    repository: &Repository,
    now_ms: i64,
    rand01: f64,
    policy: &PollPolicy,
) -> i64 {
    if repository.last_attempt_ms.is_none() {
        return 0;
    }

    let base = match &repository.status {
        Some(s) if s.status == BuildStatus::InProgress => policy.inprogress_ms,
        Some(s)
            if s.run_updated_ms
                .is_some_and(|ts| now_ms - ts < policy.active_window_ms) =>
        {
            policy.active_ms
        }
        _ => {
            let factor = 0.9 + rand01 * 0.1;
            (policy.idle_ms as f64 * factor).round() as i64
        }
    };

    match repository.last_updated_ms {
        Some(updated_ms) => (base - (now_ms - updated_ms)).max(0),
        None => base,
    }
}
