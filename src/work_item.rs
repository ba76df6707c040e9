//! Work items: the unit of scrape work
//!
//! A work item names one page to scrape. The engine only needs to compare,
//! hash, log and navigate to items, so anything satisfying [`WorkItem`] can be
//! fed through the retry, batch, supervisor and super-scrape layers.

use std::fmt;
use std::hash::Hash;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use url::Url;

/// One unit of scrape work
///
/// Identity is value equality: two items that compare equal are the same
/// piece of work and are scraped at most once per run.
pub trait WorkItem: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync {
    /// Page to load for this item
    fn url(&self) -> &str;

    /// Season label, for items that target one season of a competition
    fn season(&self) -> Option<&str> {
        None
    }
}

impl WorkItem for String {
    fn url(&self) -> &str {
        self
    }
}

/// A single match centre page
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchUrl(String);

impl MatchUrl {
    /// Parse and validate a match URL
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not an absolute http(s) URL.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let parsed = Url::parse(trimmed).with_context(|| format!("invalid match URL '{trimmed}'"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!("unsupported scheme in match URL '{trimmed}'");
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Numeric match id, when the URL follows the `/matches/<id>/...` layout
    #[must_use]
    pub fn match_id(&self) -> Option<u64> {
        match_id_from_url(&self.0)
    }
}

impl fmt::Display for MatchUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl WorkItem for MatchUrl {
    fn url(&self) -> &str {
        &self.0
    }
}

/// A competition page plus the season to select on it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonTarget {
    pub url: String,
    pub season: String,
}

impl SeasonTarget {
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the season label is empty.
    pub fn new(url: &str, season: &str) -> Result<Self> {
        let url = url.trim();
        Url::parse(url).with_context(|| format!("invalid competition URL '{url}'"))?;
        let season = season.trim();
        if season.is_empty() {
            bail!("empty season label for '{url}'");
        }
        Ok(Self {
            url: url.to_string(),
            season: season.to_string(),
        })
    }
}

impl fmt::Display for SeasonTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.url, self.season)
    }
}

impl WorkItem for SeasonTarget {
    fn url(&self) -> &str {
        &self.url
    }

    fn season(&self) -> Option<&str> {
        Some(&self.season)
    }
}

/// Extract the numeric match id from a match centre URL
///
/// Match centre URLs look like `https://host/matches/1729431/live/...`; the id
/// is the path segment right after `matches`.
#[must_use]
pub fn match_id_from_url(raw: &str) -> Option<u64> {
    let parsed = Url::parse(raw).ok()?;
    let mut segments = parsed.path_segments()?;
    segments
        .by_ref()
        .find(|segment| segment.eq_ignore_ascii_case("matches"))?;
    segments.next()?.parse().ok()
}

/// Read match URLs from a targets file, one per line
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
///
/// Returns an error if the file cannot be read or any line is not a valid URL.
pub fn load_match_urls(path: &Path) -> Result<Vec<MatchUrl>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read targets file {}", path.display()))?;
    target_lines(&text)
        .map(|(line_no, line)| {
            MatchUrl::parse(line).with_context(|| format!("{}:{line_no}", path.display()))
        })
        .collect()
}

/// Read season targets from a targets file, `url<TAB>season` per line
///
/// # Errors
///
/// Returns an error if the file cannot be read or a line is missing its season.
pub fn load_season_targets(path: &Path) -> Result<Vec<SeasonTarget>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read targets file {}", path.display()))?;
    target_lines(&text)
        .map(|(line_no, line)| {
            let Some((url, season)) = line.split_once('\t') else {
                bail!("{}:{line_no}: expected `url<TAB>season`", path.display());
            };
            SeasonTarget::new(url, season).with_context(|| format!("{}:{line_no}", path.display()))
        })
        .collect()
}

fn target_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim_end()))
        .filter(|(_, line)| {
            let trimmed = line.trim_start();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
}
