//! Configuration module for scrape runs
//!
//! This module provides the `ScrapeConfig` struct, its type-safe builder, and
//! the per-kind profiles that supply default thresholds.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod profile;
pub mod types;

// Re-exports for public API
pub use builder::{ScrapeConfigBuilder, WithKind};
pub use profile::{KindProfile, ScrapeKind};
pub use types::ScrapeConfig;
