//! Per-kind tuning profiles
//!
//! Each kind of scrape has its own tolerance for failure. Schedule pages are
//! few and cheap, so a short streak of failures already signals trouble.
//! Match centre pages come in the hundreds and fail sporadically, so they
//! tolerate longer streaks, and even longer ones in supervised mode where a
//! person is watching the run.

use serde::{Deserialize, Serialize};

use crate::scrape_engine::RetryPolicy;

/// What a run scrapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScrapeKind {
    /// Season fixture lists, one item per competition season
    Schedule,
    /// Match centre incident timelines
    #[default]
    Incidents,
    /// Match centre player statistics tables
    PlayerStats,
}

/// Thresholds applied to one kind of scrape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindProfile {
    pub streak_limit: usize,
    pub max_passes: usize,
    pub retry: RetryPolicy,
}

impl ScrapeKind {
    #[must_use]
    pub fn profile(self, supervised: bool) -> KindProfile {
        match (self, supervised) {
            (Self::Schedule, false) => KindProfile {
                streak_limit: 2,
                max_passes: 2,
                retry: RetryPolicy::default(),
            },
            (Self::Schedule, true) => KindProfile {
                streak_limit: 3,
                max_passes: 2,
                retry: RetryPolicy::default(),
            },
            (Self::Incidents, false) => KindProfile {
                streak_limit: 10,
                max_passes: 2,
                retry: RetryPolicy::default(),
            },
            (Self::Incidents, true) => KindProfile {
                streak_limit: 30,
                max_passes: 3,
                retry: RetryPolicy::default(),
            },
            (Self::PlayerStats, false) => KindProfile {
                streak_limit: 10,
                max_passes: 2,
                retry: RetryPolicy::default(),
            },
            (Self::PlayerStats, true) => KindProfile {
                streak_limit: 30,
                max_passes: 2,
                retry: RetryPolicy::default(),
            },
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Incidents => "incidents",
            Self::PlayerStats => "player_stats",
        }
    }
}
