//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

mod common;

use common::{parse_json, run_cli_failure, run_cli_success};

const NOW: &str = "--now=2024-06-12T15:30:00Z";

#[test]
fn test_streak_record_and_show() {
    let dir = tempfile::tempdir().unwrap();
    let last_week = "--now=2024-06-05T10:00:00Z";

    run_cli_success(dir.path(), &["streak", "record", last_week]);
    let recorded = parse_json(&run_cli_success(dir.path(), &["streak", "record", NOW]));
    assert_eq!(recorded["newly_recorded"], true);
    assert_eq!(recorded["marker"]["week_start"], "2024-06-10");

    let report = parse_json(&run_cli_success(dir.path(), &["streak", "show", NOW]));
    assert_eq!(report["current_streak"], 2);
    assert_eq!(report["longest_streak"], 2);
    assert_eq!(report["total_active_weeks"], 2);
}

#[test]
fn test_dragon_feed_until_empty() {
    let dir = tempfile::tempdir().unwrap();

    let status = parse_json(&run_cli_success(dir.path(), &["dragon", "show", NOW]));
    assert_eq!(status["current_slots"], 3);

    for expected in [2, 1, 0] {
        let outcome = parse_json(&run_cli_success(dir.path(), &["dragon", "feed", NOW]));
        assert_eq!(outcome["slots_after"], expected);
    }

    // Empty feed is reported, not treated as a failure
    let status = parse_json(&run_cli_success(dir.path(), &["dragon", "feed", NOW]));
    assert_eq!(status["current_slots"], 0);
    assert_eq!(status["next_slot_in"], "8h 0m");
}

#[test]
fn test_owners_are_separate() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["dragon", "feed", "--owner", "amy", NOW]);

    let bob = parse_json(&run_cli_success(dir.path(), &["dragon", "show", "--owner", "bob", NOW]));
    assert_eq!(bob["current_slots"], 3);
}

#[test]
fn test_harvest_mark_and_list() {
    let dir = tempfile::tempdir().unwrap();
    run_cli_success(dir.path(), &["harvest", "mark", "Lana", NOW]);

    let roster = parse_json(&run_cli_success(dir.path(), &["harvest", "list", NOW]));
    let lana = roster
        .as_array()
        .unwrap()
        .iter()
        .find(|h| h["villager_name"] == "Lana")
        .unwrap();
    assert_eq!(lana["has_harvested"], true);

    let stderr = run_cli_failure(dir.path(), &["harvest", "mark", "Nobody", NOW]);
    assert!(stderr.contains("Unknown villager"));
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "dragon.hours_per_slot"]).trim(),
        "8"
    );
    run_cli_success(dir.path(), &["config", "set", "profile.owner_id", "amy"]);
    assert_eq!(
        run_cli_success(dir.path(), &["config", "get", "profile.owner_id"]).trim(),
        "amy"
    );
    run_cli_failure(dir.path(), &["config", "set", "dragon.wings", "2"]);
}

#[test]
fn test_config_rejects_out_of_range_cadence() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_cli_failure(
        dir.path(),
        &["config", "set", "dragon.hours_per_slot", "1000000000000000"],
    );
    assert!(stderr.contains("dragon.hours_per_slot"));

    // The rejected value was not saved, so the dragon still works.
    let status = parse_json(&run_cli_success(dir.path(), &["dragon", "show", NOW]));
    assert_eq!(status["current_slots"], 3);
}

#[test]
fn test_invalid_now_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let stderr = run_cli_failure(dir.path(), &["streak", "show", "--now=yesterday"]);
    assert!(stderr.contains("invalid --now"));
}
