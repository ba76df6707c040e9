//! Tests for the single-attempt wrapper and the two-attempt retry controller

use std::time::{Duration, Instant};

use kodegen_tools_matchscrape::scrape_engine::{
    DelayRange, FailureKind, ItemOutcome, LoadMode, RetryPolicy, scrape_single_item,
    scrape_with_retry,
};

mod common;
use common::{FakeSession, Row, Script, ScriptedExtractor, instant_retry, match_urls};

#[tokio::test]
async fn test_first_attempt_success_needs_one_navigation() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::Rows(3));

    let outcome = scrape_with_retry(&mut session, &extractor, item, &instant_retry()).await;

    match outcome {
        ItemOutcome::Scraped(rows) => assert_eq!(rows.len(), 3),
        ItemOutcome::Failed => panic!("item should scrape on the first attempt"),
    }
    assert_eq!(extractor.attempts(item), 1);
    assert_eq!(session.navigations, vec![item.clone()]);
}

#[tokio::test]
async fn test_single_failure_is_recovered_by_the_retry() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::FailTimes(1));

    let outcome = scrape_with_retry(&mut session, &extractor, item, &instant_retry()).await;

    assert_eq!(
        outcome,
        ItemOutcome::Scraped(vec![Row {
            item: item.clone(),
            index: 0
        }])
    );
    assert_eq!(extractor.attempts(item), 2);
    assert_eq!(session.navigations.len(), 2, "the retry re-navigates");
}

#[tokio::test]
async fn test_item_is_never_tried_more_than_twice() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::AlwaysFail);

    let outcome = scrape_with_retry(&mut session, &extractor, item, &instant_retry()).await;

    assert_eq!(outcome, ItemOutcome::Failed);
    assert_eq!(extractor.attempts(item), 2);
}

#[tokio::test]
async fn test_already_loaded_first_attempt_skips_navigation() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::showing(item);
    let extractor = ScriptedExtractor::new();
    let policy = RetryPolicy {
        delay: DelayRange::NONE,
        first_attempt: LoadMode::AlreadyLoaded,
    };

    let outcome = scrape_with_retry(&mut session, &extractor, item, &policy).await;

    assert!(outcome.is_scraped());
    assert!(session.navigations.is_empty());
}

#[tokio::test]
async fn test_retry_after_already_loaded_failure_navigates() {
    let item = &match_urls(2)[1];
    let mut session = FakeSession::showing("https://example.com/regions/252");
    let extractor = ScriptedExtractor::new();
    let policy = RetryPolicy {
        delay: DelayRange::NONE,
        first_attempt: LoadMode::AlreadyLoaded,
    };

    let outcome = scrape_with_retry(&mut session, &extractor, item, &policy).await;

    assert!(outcome.is_scraped());
    assert_eq!(extractor.attempts(item), 2);
    assert_eq!(session.navigations, vec![item.clone()]);
}

#[tokio::test]
async fn test_retry_waits_for_the_jittered_delay() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::FailTimes(1));
    let policy = RetryPolicy {
        delay: DelayRange {
            min_ms: 60,
            max_ms: 80,
        },
        first_attempt: LoadMode::Navigate,
    };

    let start = Instant::now();
    let outcome = scrape_with_retry(&mut session, &extractor, item, &policy).await;

    assert!(outcome.is_scraped());
    assert!(start.elapsed() >= Duration::from_millis(60), "{:?}", start.elapsed());
}

#[tokio::test]
async fn test_empty_extraction_is_a_success() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::Rows(0));

    let outcome = scrape_with_retry(&mut session, &extractor, item, &instant_retry()).await;

    assert_eq!(outcome, ItemOutcome::Scraped(Vec::new()));
    assert_eq!(extractor.attempts(item), 1);
}

#[tokio::test]
async fn test_single_attempt_reports_navigation_failures() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    session.fail_navigation_to.insert(item.clone());
    let extractor = ScriptedExtractor::new();

    let failure = scrape_single_item(&mut session, &extractor, item, LoadMode::Navigate)
        .await
        .expect_err("navigation is scripted to fail");

    assert_eq!(failure.kind, FailureKind::Navigation);
    assert_eq!(failure.item, *item);
    assert_eq!(extractor.attempts(item), 0, "extraction never ran");
}

#[tokio::test]
async fn test_single_attempt_classifies_extraction_timeouts() {
    let item = &match_urls(1)[0];
    let mut session = FakeSession::new();
    let extractor = ScriptedExtractor::new().script(item, Script::AlwaysFail);

    let failure = scrape_single_item(&mut session, &extractor, item, LoadMode::Navigate)
        .await
        .expect_err("extraction is scripted to fail");

    assert_eq!(failure.kind, FailureKind::Timeout);
}
