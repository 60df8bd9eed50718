//! Centralized scoring constants for Tech Scenario Solver.
//!
//! Tier thresholds and score bounds live here so that grading changes are
//! reviewed in version control instead of drifting through JSON assets.
//! `ScoringConfig` overrides the thresholds at runtime when a caller supplies one.

// Score bounds -------------------------------------------------------------
pub const SCORE_MIN: u8 = 0;
pub const SCORE_MAX: u8 = 10;

// Performance tiers --------------------------------------------------------
pub const TIER_EXCELLENT_MIN: f32 = 8.0;
pub const TIER_GOOD_MIN: f32 = 6.0;
pub const TIER_DEVELOPING_MIN: f32 = 4.0;

// Assets -------------------------------------------------------------------
pub(crate) const DEFAULT_CATALOG_DATA: &str = include_str!("../assets/scenarios.json");
