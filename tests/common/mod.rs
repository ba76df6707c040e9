//! Scripted session and extractor fakes for the engine test suite

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kodegen_tools_matchscrape::page_extractor::{ExtractError, PageExtractor};
use kodegen_tools_matchscrape::scrape_engine::{
    BatchPolicy, ChunkPolicy, DelayRange, LoadMode, PassPolicy, ProgressReporter, RetryPolicy,
};
use kodegen_tools_matchscrape::session::{BrowserSession, SessionError};

/// In-memory browser session
///
/// Navigation just records the URL. The session can be told to die after a
/// number of navigations, after which every call fails.
pub struct FakeSession {
    pub current: String,
    pub navigations: Vec<String>,
    pub die_after_navigations: Option<usize>,
    /// Liveness probes answered before the browser stops answering
    pub die_after_probes: Option<usize>,
    pub fail_navigation_to: HashSet<String>,
    pub alive: bool,
    pub probes: AtomicUsize,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self {
            current: "about:blank".to_string(),
            navigations: Vec::new(),
            die_after_navigations: None,
            die_after_probes: None,
            fail_navigation_to: HashSet::new(),
            alive: true,
            probes: AtomicUsize::new(0),
        }
    }
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dying_after(navigations: usize) -> Self {
        Self {
            die_after_navigations: Some(navigations),
            ..Self::default()
        }
    }

    pub fn dying_after_probes(probes: usize) -> Self {
        Self {
            die_after_probes: Some(probes),
            ..Self::default()
        }
    }

    pub fn showing(url: &str) -> Self {
        Self {
            current: url.to_string(),
            ..Self::default()
        }
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn current_url(&self) -> Result<String, SessionError> {
        let probe = self.probes.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(limit) = self.die_after_probes
            && probe > limit
        {
            return Err(SessionError::Closed("fake browser stopped answering".into()));
        }
        if self.alive {
            Ok(self.current.clone())
        } else {
            Err(SessionError::Closed("fake browser exited".into()))
        }
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        if !self.alive {
            return Err(SessionError::Closed("fake browser exited".into()));
        }
        if let Some(limit) = self.die_after_navigations
            && self.navigations.len() >= limit
        {
            self.alive = false;
            return Err(SessionError::Closed("fake browser crashed".into()));
        }
        self.navigations.push(url.to_string());
        if self.fail_navigation_to.contains(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                message: "net::ERR_CONNECTION_RESET".into(),
            });
        }
        self.current = url.to_string();
        Ok(())
    }
}

/// What the extractor does for one item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    /// Succeed with this many rows
    Rows(usize),
    /// Fail every attempt
    AlwaysFail,
    /// Fail the first `n` attempts, then succeed with one row
    FailTimes(usize),
    /// Succeed with one row, then kill the session
    SucceedThenKill,
    /// Kill the session and fail
    KillAndFail,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row {
    pub item: String,
    pub index: usize,
}

/// Extractor whose behaviour per item is scripted; unscripted items succeed
/// with one row
///
/// Every attempt first checks that the session shows the item's page, so an
/// already-loaded attempt on the wrong page fails like a real one would.
#[derive(Default)]
pub struct ScriptedExtractor {
    scripts: HashMap<String, Script>,
    attempts: Mutex<HashMap<String, usize>>,
}

impl ScriptedExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, item: &str, script: Script) -> Self {
        self.scripts.insert(item.to_string(), script);
        self
    }

    pub fn from_scripts(items: &[String], scripts: &[Script]) -> Self {
        let mut extractor = Self::new();
        for (item, script) in items.iter().zip(scripts) {
            extractor.scripts.insert(item.clone(), *script);
        }
        extractor
    }

    pub fn attempts(&self, item: &str) -> usize {
        self.attempts.lock().unwrap().get(item).copied().unwrap_or(0)
    }

    pub fn total_attempts(&self) -> usize {
        self.attempts.lock().unwrap().values().sum()
    }

    fn rows(item: &str, count: usize) -> Vec<Row> {
        (0..count)
            .map(|index| Row {
                item: item.to_string(),
                index,
            })
            .collect()
    }
}

#[async_trait]
impl PageExtractor<FakeSession> for ScriptedExtractor {
    type Item = String;
    type Record = Row;

    async fn extract(&self, session: &mut FakeSession, item: &String) -> Result<Vec<Row>, ExtractError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            let count = attempts.entry(item.clone()).or_insert(0);
            *count += 1;
            *count
        };

        if !session.alive {
            return Err(SessionError::Closed("fake browser exited".into()).into());
        }
        if session.current != *item {
            return Err(ExtractError::UnexpectedContent(format!(
                "showing {} instead of {item}",
                session.current
            )));
        }

        match self.scripts.get(item).copied().unwrap_or(Script::Rows(1)) {
            Script::Rows(count) => Ok(Self::rows(item, count)),
            Script::AlwaysFail => Err(ExtractError::ElementTimeout {
                selector: "#live-incidents".into(),
                timeout: Duration::from_secs(15),
            }),
            Script::FailTimes(n) if attempt <= n => Err(ExtractError::MalformedElement {
                selector: "#live-incidents".into(),
                detail: format!("attempt {attempt} saw a partial render"),
            }),
            Script::FailTimes(_) => Ok(Self::rows(item, 1)),
            Script::SucceedThenKill => {
                session.kill();
                Ok(Self::rows(item, 1))
            }
            Script::KillAndFail => {
                session.kill();
                Err(SessionError::Closed("renderer crashed".into()).into())
            }
        }
    }
}

/// Progress reporter that records every event as a string
#[derive(Default)]
pub struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for RecordingProgress {
    fn report_chunk_started(&self, index: usize, total: usize, items: usize) {
        self.push(format!("chunk {index}/{total} ({items})"));
    }

    fn report_pass_started(&self, pass: usize, items: usize) {
        self.push(format!("pass {pass} ({items})"));
    }

    fn report_item_scraped(&self, item: &str, records: usize) {
        self.push(format!("scraped {item} ({records})"));
    }

    fn report_item_failed(&self, item: &str) {
        self.push(format!("failed {item}"));
    }

    fn report_streak_abort(&self, streak: usize, pending: usize) {
        self.push(format!("streak {streak} ({pending} pending)"));
    }

    fn report_session_lost(&self, reason: &str) {
        self.push(format!("session lost: {reason}"));
    }

    fn report_completed(&self, scraped: usize, missed: usize) {
        self.push(format!("completed {scraped}/{missed}"));
    }
}

/// Match URLs `https://example.com/matches/<i>/live` for `i` in `0..n`
pub fn match_urls(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://example.com/matches/{i}/live"))
        .collect()
}

pub fn instant_retry() -> RetryPolicy {
    RetryPolicy {
        delay: DelayRange::NONE,
        first_attempt: LoadMode::Navigate,
    }
}

pub fn batch_policy(streak_limit: usize) -> BatchPolicy {
    BatchPolicy {
        retry: instant_retry(),
        streak_limit,
        health_probe_timeout: Duration::from_secs(1),
    }
}

pub fn pass_policy(streak_limit: usize, max_passes: usize) -> PassPolicy {
    PassPolicy {
        batch: batch_policy(streak_limit),
        max_passes,
    }
}

pub fn chunk_policy(streak_limit: usize, max_passes: usize, chunk_size: usize) -> ChunkPolicy {
    ChunkPolicy {
        passes: pass_policy(streak_limit, max_passes),
        chunk_size,
        chunk_pause: DelayRange::NONE,
    }
}
