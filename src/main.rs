//! Command-line front end for matchscrape
//!
//! Reads a targets file, drives one browser session through the chunked
//! scrape engine, and writes a JSON report with records and missed targets.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{ArgAction, Parser};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kodegen_tools_matchscrape::config::{ScrapeConfig, ScrapeKind};
use kodegen_tools_matchscrape::page_extractor::RenderedPageExtractor;
use kodegen_tools_matchscrape::scrape_engine::{LogProgress, SuperScrapeOutcome, dedup_items};
use kodegen_tools_matchscrape::work_item::{WorkItem, load_match_urls, load_season_targets};
use kodegen_tools_matchscrape::{ScrapeReport, scrape_with_browser};

#[derive(Parser)]
#[command(name = "kodegen-matchscrape")]
#[command(about = "Resilient browser-driven scraping of football match centres")]
#[command(version)]
struct Cli {
    /// Targets file: one URL per line, or `url<TAB>season` for schedules
    targets: PathBuf,

    /// What the targets are [default: incidents, or the config file's kind]
    #[arg(short, long, value_enum)]
    kind: Option<ScrapeKind>,

    /// Someone is watching: tolerate longer failure streaks (`-s true|false`)
    #[arg(short, long, action = ArgAction::Set)]
    supervised: Option<bool>,

    /// JSON config file; flags given here override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the JSON report
    #[arg(short, long, default_value = "matchscrape-report.json")]
    out: PathBuf,

    /// Items per super-scrape chunk
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Consecutive failures that end a pass
    #[arg(long)]
    streak_limit: Option<usize>,

    /// Maximum passes per chunk
    #[arg(long)]
    max_passes: Option<usize>,

    /// CSS selector that must render before a page is captured
    #[arg(long)]
    ready_selector: Option<String>,

    /// `<select>` holding the season list on competition pages
    #[arg(long, default_value = "#seasons")]
    season_select: String,

    /// Show the browser window
    #[arg(long)]
    headed: bool,

    /// Fixed browser profile directory
    #[arg(long)]
    chrome_data_dir: Option<PathBuf>,
}

impl Cli {
    fn scrape_config(&self) -> Result<ScrapeConfig> {
        let mut builder = match &self.config {
            Some(path) => ScrapeConfig::from_json_file(path)?.into_builder(),
            None => ScrapeConfig::builder().scrape_kind(ScrapeKind::default()),
        };

        if let Some(kind) = self.kind {
            builder = builder.scrape_kind(kind);
        }
        if let Some(supervised) = self.supervised {
            builder = builder.supervised(supervised);
        }
        if let Some(size) = self.chunk_size {
            builder = builder.chunk_size(size);
        }
        if let Some(limit) = self.streak_limit {
            builder = builder.streak_limit(limit);
        }
        if let Some(passes) = self.max_passes {
            builder = builder.max_passes(passes);
        }
        if self.headed {
            builder = builder.headless(false);
        }
        if let Some(dir) = &self.chrome_data_dir {
            builder = builder.chrome_data_dir(dir.clone());
        }
        builder.build()
    }
}

async fn run<W>(cli: &Cli, config: &ScrapeConfig, items: Vec<W>) -> Result<()>
where
    W: WorkItem + 'static,
{
    let mut extractor = RenderedPageExtractor::<W>::new()
        .with_ready_wait(config.element_timeout())
        .with_season_select(cli.season_select.clone());
    if let Some(selector) = &cli.ready_selector {
        extractor = extractor.with_ready_selector(selector.clone());
    }

    let started_at = Utc::now();
    let outcome = scrape_with_browser(config, &extractor, &items, &LogProgress).await?;
    write_report(cli, config, items.len(), started_at, outcome)
}

fn write_report<W: std::fmt::Display, R: Serialize>(
    cli: &Cli,
    config: &ScrapeConfig,
    targets: usize,
    started_at: chrono::DateTime<Utc>,
    outcome: SuperScrapeOutcome<W, R>,
) -> Result<()> {
    let report = ScrapeReport::from_outcome(config.scrape_kind(), config.supervised(), targets, started_at, outcome);
    report.write_json(&cli.out)?;
    info!(
        "Wrote {} ({} scraped, {} missed)",
        cli.out.display(),
        report.scraped,
        report.missed.len()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("matchscrape=info".parse()?)
                .add_directive("kodegen_tools_matchscrape=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.scrape_config().context("invalid configuration")?;

    match config.scrape_kind() {
        ScrapeKind::Schedule => {
            let items = dedup_items(&load_season_targets(&cli.targets)?);
            run(&cli, &config, items).await
        }
        ScrapeKind::Incidents | ScrapeKind::PlayerStats => {
            let items = dedup_items(&load_match_urls(&cli.targets)?);
            run(&cli, &config, items).await
        }
    }
}
