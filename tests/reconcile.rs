use buildwatch::domain::model::{BuildStatus, Repository, RunRecord, RunSnapshot};
use buildwatch::domain::reconcile::{reconcile, sort_key, sort_repositories};

const HOUR_MS: i64 = 60 * 60 * 1000;
const NOW_MS: i64 = 1_700_000_000_000;

fn push_run(commit_message: &str) -> RunRecord {
    RunRecord {
        event: "push".to_string(),
        status: Some("completed".to_string()),
        conclusion: Some("success".to_string()),
        head_branch: Some("main".to_string()),
        commit_hash: Some("abc123def456".to_string()),
        commit_message: Some(commit_message.to_string()),
        commit_date_ms: Some(NOW_MS - HOUR_MS),
        commit_author: Some("Mona Lisa".to_string()),
        actor_login: Some("octocat".to_string()),
        actor_kind: Some("User".to_string()),
        created_ms: Some(NOW_MS - HOUR_MS),
        started_ms: Some(NOW_MS - HOUR_MS + 1_000),
        updated_ms: Some(NOW_MS - HOUR_MS + 60_000),
        run_id: Some(42),
        run_number: Some(7),
    }
}

fn pull_request_run() -> RunRecord {
    RunRecord {
        event: "pull_request".to_string(),
        status: Some("completed".to_string()),
        conclusion: Some("failure".to_string()),
        ..Default::default()
    }
}

fn with_status(name: &str, snapshot: RunSnapshot) -> Repository {
    let mut repository = Repository::new(name.to_string());
    repository.status = Some(snapshot);
    repository
}

fn snapshot(updated_ms: Option<i64>, started_ms: Option<i64>, created_ms: Option<i64>) -> RunSnapshot {
    RunSnapshot {
        branch: None,
        commit_hash: None,
        commit_message: None,
        commit_date_ms: None,
        commit_author: None,
        user: None,
        run_created_ms: created_ms,
        run_started_ms: started_ms,
        run_updated_ms: updated_ms,
        run_id: None,
        run_number: None,
        status: BuildStatus::Success,
    }
}

#[test]
fn picks_first_push_run_in_upstream_order() {
    let mut repository = Repository::new("octocat/Hello-World".to_string());
    let runs = vec![
        pull_request_run(),
        push_run("first push"),
        push_run("second push"),
    ];

    assert!(reconcile(&mut repository, &runs, NOW_MS));
    let status = repository.status.expect("snapshot applied");
    assert_eq!(status.commit_message.as_deref(), Some("first push"));
    assert_eq!(status.status, BuildStatus::Success);
    assert_eq!(status.run_id, Some(42));
    assert_eq!(repository.last_updated_ms, Some(NOW_MS));
}

#[test]
fn no_push_run_leaves_existing_status_untouched() {
    let mut repository = with_status("octocat/Hello-World", snapshot(Some(1), None, None));
    repository.last_updated_ms = Some(123);

    let before = repository.clone();
    assert!(!reconcile(&mut repository, &[pull_request_run()], NOW_MS));
    assert_eq!(repository, before);

    // Same for a repository that never had a status.
    let mut fresh = Repository::new("octocat/Spoon-Knife".to_string());
    assert!(!reconcile(&mut fresh, &[], NOW_MS));
    assert!(fresh.status.is_none());
    assert!(fresh.last_updated_ms.is_none());
}

#[test]
fn status_is_replaced_wholesale() {
    let mut repository = with_status(
        "octocat/Hello-World",
        RunSnapshot {
            user: Some("someone".to_string()),
            ..snapshot(Some(1), Some(2), Some(3))
        },
    );

    let mut run = push_run("new commit");
    run.actor_kind = Some("Bot".to_string());
    run.started_ms = None;
    assert!(reconcile(&mut repository, &[run], NOW_MS));

    let status = repository.status.expect("snapshot applied");
    // Fields absent upstream are absent in the snapshot, not inherited.
    assert_eq!(status.user, None);
    assert_eq!(status.run_started_ms, None);
}

#[test]
fn user_is_set_only_for_human_actors() {
    let mut repository = Repository::new("octocat/Hello-World".to_string());
    assert!(reconcile(&mut repository, &[push_run("by a human")], NOW_MS));
    assert_eq!(
        repository.status.as_ref().unwrap().user.as_deref(),
        Some("octocat")
    );

    let mut bot_run = push_run("by a bot");
    bot_run.actor_login = Some("dependabot[bot]".to_string());
    bot_run.actor_kind = Some("Bot".to_string());
    assert!(reconcile(&mut repository, &[bot_run], NOW_MS));
    assert_eq!(repository.status.as_ref().unwrap().user, None);
    assert_eq!(
        repository.status.as_ref().unwrap().commit_author.as_deref(),
        Some("Mona Lisa")
    );
}

#[test]
fn commit_message_is_first_line_only() {
    let mut repository = Repository::new("octocat/Hello-World".to_string());
    let run = push_run("subject line\n\nlong body\nmore body");
    assert!(reconcile(&mut repository, &[run], NOW_MS));
    assert_eq!(
        repository.status.unwrap().commit_message.as_deref(),
        Some("subject line")
    );
}

#[test]
fn sort_key_falls_back_through_run_timestamps() {
    assert_eq!(
        sort_key(&with_status("a/a", snapshot(Some(30), Some(20), Some(10)))),
        30
    );
    assert_eq!(
        sort_key(&with_status("a/a", snapshot(None, Some(20), Some(10)))),
        20
    );
    assert_eq!(
        sort_key(&with_status("a/a", snapshot(None, None, Some(10)))),
        10
    );
    assert_eq!(sort_key(&with_status("a/a", snapshot(None, None, None))), 0);
    assert_eq!(sort_key(&Repository::new("a/a".to_string())), 0);
}

#[test]
fn freshest_first_and_statusless_sink_in_insertion_order() {
    // A updated 2 hours ago, B 10 minutes ago, C and D never.
    let a = with_status("owner/a", snapshot(Some(NOW_MS - 2 * HOUR_MS), None, None));
    let b = with_status("owner/b", snapshot(Some(NOW_MS - 10 * 60 * 1000), None, None));
    let c = Repository::new("owner/c".to_string());
    let d = Repository::new("owner/d".to_string());

    let mut repositories = vec![c.clone(), a.clone(), d.clone(), b.clone()];
    sort_repositories(&mut repositories);

    let names: Vec<&str> = repositories.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["owner/b", "owner/a", "owner/c", "owner/d"]);
}
