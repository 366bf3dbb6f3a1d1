use buildwatch::domain::model::{BuildStatus, Repository, RunSnapshot};
use buildwatch::domain::schedule::{next_poll_delay_ms, PollPolicy};

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;
const NOW_MS: i64 = 1_700_000_000_000;

fn policy() -> PollPolicy {
    PollPolicy::default()
}

fn repo_with(status: Option<BuildStatus>, run_updated_ms: Option<i64>) -> Repository {
    let mut repository = Repository::new("owner/repo".to_string());
    repository.last_attempt_ms = Some(NOW_MS - MINUTE_MS);
    repository.last_updated_ms = Some(NOW_MS);
    if let Some(status) = status {
        repository.status = Some(RunSnapshot {
            branch: None,
            commit_hash: None,
            commit_message: None,
            commit_date_ms: None,
            commit_author: None,
            user: None,
            run_created_ms: None,
            run_started_ms: None,
            run_updated_ms,
            run_id: None,
            run_number: None,
            status,
        });
    }
    repository
}

#[test]
fn never_attempted_polls_immediately() {
    let repository = Repository::new("owner/repo".to_string());
    assert_eq!(next_poll_delay_ms(&repository, NOW_MS, 0.0, &policy()), 0);
    assert_eq!(next_poll_delay_ms(&repository, NOW_MS, 0.99, &policy()), 0);
}

#[test]
fn in_progress_polls_every_minute() {
    // Overrides the recent-update and idle rules.
    let repository = repo_with(Some(BuildStatus::InProgress), Some(NOW_MS - MINUTE_MS));
    assert_eq!(
        next_poll_delay_ms(&repository, NOW_MS, 0.5, &policy()),
        60_000
    );
}

#[test]
fn recently_updated_polls_every_five_minutes() {
    let repository = repo_with(Some(BuildStatus::Success), Some(NOW_MS - 2 * HOUR_MS));
    assert_eq!(
        next_poll_delay_ms(&repository, NOW_MS, 0.5, &policy()),
        300_000
    );
}

#[test]
fn active_window_boundary_is_seven_days() {
    let inside = repo_with(Some(BuildStatus::Success), Some(NOW_MS - 7 * DAY_MS + 1));
    assert_eq!(next_poll_delay_ms(&inside, NOW_MS, 1.0, &policy()), 300_000);

    let outside = repo_with(Some(BuildStatus::Success), Some(NOW_MS - 7 * DAY_MS));
    assert_eq!(
        next_poll_delay_ms(&outside, NOW_MS, 1.0, &policy()),
        HOUR_MS
    );
}

#[test]
fn idle_delay_is_jittered_within_bounds() {
    let repository = repo_with(Some(BuildStatus::Failure), Some(NOW_MS - 30 * DAY_MS));
    let low = next_poll_delay_ms(&repository, NOW_MS, 0.0, &policy());
    let high = next_poll_delay_ms(&repository, NOW_MS, 1.0, &policy());
    assert_eq!(low, (HOUR_MS as f64 * 0.9).round() as i64);
    assert_eq!(high, HOUR_MS);

    let mid = next_poll_delay_ms(&repository, NOW_MS, 0.5, &policy());
    assert!(low < mid && mid < high);
}

#[test]
fn statusless_but_attempted_uses_idle_cadence() {
    let mut repository = repo_with(None, None);
    repository.last_updated_ms = None; // attempted, never succeeded
    assert_eq!(
        next_poll_delay_ms(&repository, NOW_MS, 1.0, &policy()),
        HOUR_MS
    );
}

#[test]
fn late_correction_anchors_to_last_successful_update() {
    let mut repository = repo_with(Some(BuildStatus::Success), Some(NOW_MS - HOUR_MS));
    repository.last_updated_ms = Some(NOW_MS - 100_000);
    // 5 minutes since the last applied change, not since this call.
    assert_eq!(
        next_poll_delay_ms(&repository, NOW_MS, 0.5, &policy()),
        200_000
    );
}

#[test]
fn late_correction_never_goes_negative() {
    let mut repository = repo_with(Some(BuildStatus::Success), Some(NOW_MS - HOUR_MS));
    repository.last_updated_ms = Some(NOW_MS - 2 * HOUR_MS);
    assert_eq!(next_poll_delay_ms(&repository, NOW_MS, 0.5, &policy()), 0);
}
