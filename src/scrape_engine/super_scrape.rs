//! Chunked super-scrape
//!
//! Long runs (a full season of match centres) are split into fixed-size
//! chunks, each handled by the multi-pass supervisor. A chunk is the unit of
//! recovery: if the browser dies while a chunk is running, that chunk's
//! partial records are dropped and its items plus every later chunk are
//! reported missed, so a rerun over `missed` never duplicates records.

use log::{info, warn};

use super::dedup_items;
use super::policy::ChunkPolicy;
use super::progress::ProgressReporter;
use super::supervisor::run_passes;
use crate::page_extractor::PageExtractor;
use crate::session::{BrowserSession, SessionHealth, check_session_health};

/// Result of a chunked run
#[derive(Debug, Clone)]
pub struct SuperScrapeOutcome<W, R> {
    /// Records from completed chunks
    pub records: Vec<R>,
    /// Input items without records, in input order
    pub missed: Vec<W>,
    pub chunks_completed: usize,
    pub chunks_total: usize,
    /// The run stopped early because the session died
    pub session_lost: bool,
}

/// Scrape `items` chunk by chunk
///
/// Duplicate items in the input are scraped once.
pub async fn super_scrape<S, E, P>(
    session: &mut S,
    extractor: &E,
    items: &[E::Item],
    policy: &ChunkPolicy,
    progress: &P,
) -> SuperScrapeOutcome<E::Item, E::Record>
where
    S: BrowserSession,
    E: PageExtractor<S>,
    P: ProgressReporter + ?Sized,
{
    let items = dedup_items(items);
    let chunk_size = policy.chunk_size.max(1);
    let chunks_total = items.len().div_ceil(chunk_size);

    let mut outcome = SuperScrapeOutcome {
        records: Vec::new(),
        missed: Vec::new(),
        chunks_completed: 0,
        chunks_total,
        session_lost: false,
    };

    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        let chunk_start = index * chunk_size;

        if index > 0 {
            policy.chunk_pause.pause().await;
        }

        if let SessionHealth::Unhealthy { reason } =
            check_session_health(&*session, policy.passes.batch.health_probe_timeout).await
        {
            warn!(
                target: "matchscrape::super_scrape",
                "Session unhealthy before chunk {}/{chunks_total}, {} items missed",
                index + 1,
                items.len() - chunk_start
            );
            progress.report_session_lost(&reason);
            outcome.missed.extend_from_slice(&items[chunk_start..]);
            outcome.session_lost = true;
            break;
        }

        progress.report_chunk_started(index, chunks_total, chunk.len());
        let passes = run_passes(session, extractor, chunk, &policy.passes, progress).await;

        if passes.session_lost {
            warn!(
                target: "matchscrape::super_scrape",
                "Session lost in chunk {}/{chunks_total}, discarding {} partial records",
                index + 1,
                passes.records.len()
            );
            outcome.missed.extend_from_slice(&items[chunk_start..]);
            outcome.session_lost = true;
            break;
        }

        info!(
            target: "matchscrape::super_scrape",
            "Chunk {}/{chunks_total} done: {} records, {} missed",
            index + 1,
            passes.records.len(),
            passes.missed.len()
        );
        outcome.records.extend(passes.records);
        outcome.missed.extend(passes.missed);
        outcome.chunks_completed += 1;
    }

    progress.report_completed(items.len() - outcome.missed.len(), outcome.missed.len());
    outcome
}
