//! Tests for the multi-pass supervisor

use kodegen_tools_matchscrape::scrape_engine::{NoOpProgress, run_passes};

mod common;
use common::{FakeSession, RecordingProgress, Script, ScriptedExtractor, match_urls, pass_policy};

#[tokio::test]
async fn test_clean_run_needs_a_single_pass() {
    let items = match_urls(4);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new();

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 3), &NoOpProgress).await;

    assert_eq!(outcome.passes, 1);
    assert_eq!(outcome.records.len(), 4);
    assert!(outcome.missed.is_empty());
    assert!(!outcome.session_lost);
}

#[tokio::test]
async fn test_second_pass_retries_only_failed_items() {
    let items = match_urls(4);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(&items[1], Script::FailTimes(2));
    let progress = RecordingProgress::default();

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 2), &progress).await;

    assert_eq!(outcome.passes, 2);
    assert!(outcome.missed.is_empty());
    assert_eq!(outcome.records.len(), 4);
    assert_eq!(extractor.attempts(&items[0]), 1, "succeeded items are not revisited");
    assert_eq!(extractor.attempts(&items[1]), 3);
    let passes: Vec<String> = progress
        .events()
        .into_iter()
        .filter(|e| e.starts_with("pass"))
        .collect();
    assert_eq!(passes, vec!["pass 1 (4)".to_string(), "pass 2 (1)".to_string()]);
}

#[tokio::test]
async fn test_pending_items_from_a_streak_abort_get_the_next_pass() {
    let items = match_urls(3);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(&items[0], Script::FailTimes(2));

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(1, 2), &NoOpProgress).await;

    assert_eq!(outcome.passes, 2);
    assert!(outcome.missed.is_empty());
    assert_eq!(extractor.attempts(&items[1]), 1);
    assert_eq!(extractor.attempts(&items[2]), 1);
}

#[tokio::test]
async fn test_pass_budget_bounds_attempts() {
    let items = match_urls(2);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(&items[0], Script::AlwaysFail);

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(30, 3), &NoOpProgress).await;

    assert_eq!(outcome.passes, 3);
    assert_eq!(outcome.missed, vec![items[0].clone()]);
    assert_eq!(extractor.attempts(&items[0]), 6, "two attempts in each of three passes");
}

#[tokio::test]
async fn test_persistent_failures_converge_to_missed() {
    let items = match_urls(10);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new()
        .script(&items[2], Script::AlwaysFail)
        .script(&items[5], Script::AlwaysFail)
        .script(&items[9], Script::AlwaysFail);

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 2), &NoOpProgress).await;

    assert_eq!(outcome.missed, vec![items[2].clone(), items[5].clone(), items[9].clone()]);
    assert_eq!(outcome.records.len(), 7);
    let mut scraped: Vec<&str> = outcome.records.iter().map(|row| row.item.as_str()).collect();
    scraped.sort();
    scraped.dedup();
    assert_eq!(scraped.len(), 7, "each scraped item contributes its records once");
}

#[tokio::test]
async fn test_missed_keeps_input_order() {
    let items = match_urls(6);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new()
        .script(&items[4], Script::AlwaysFail)
        .script(&items[1], Script::AlwaysFail)
        .script(&items[3], Script::AlwaysFail);

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 2), &NoOpProgress).await;

    assert_eq!(
        outcome.missed,
        vec![items[1].clone(), items[3].clone(), items[4].clone()]
    );
}

#[tokio::test]
async fn test_duplicate_items_are_scraped_once() {
    let urls = match_urls(2);
    let items = vec![urls[0].clone(), urls[1].clone(), urls[0].clone()];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new();

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 2), &NoOpProgress).await;

    assert_eq!(outcome.records.len(), 2);
    assert_eq!(extractor.attempts(&urls[0]), 1);
}

#[tokio::test]
async fn test_session_loss_stops_further_passes() {
    let items = match_urls(5);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new()
        .script(&items[0], Script::AlwaysFail)
        .script(&items[2], Script::KillAndFail);

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 3), &NoOpProgress).await;

    assert!(outcome.session_lost);
    assert_eq!(outcome.passes, 1);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(
        outcome.missed,
        vec![items[0].clone(), items[2].clone(), items[3].clone(), items[4].clone()]
    );
}

#[tokio::test]
async fn test_crash_on_the_last_item_is_reported_as_session_loss() {
    let items = match_urls(3);
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(&items[2], Script::SucceedThenKill);
    let progress = RecordingProgress::default();

    let outcome = run_passes(&mut session, &extractor, &items, &pass_policy(10, 2), &progress).await;

    assert!(outcome.session_lost);
    assert_eq!(outcome.passes, 1);
    assert_eq!(outcome.records.len(), 3);
    assert!(outcome.missed.is_empty());
    assert!(progress.events().iter().any(|e| e.starts_with("session lost")));
}
