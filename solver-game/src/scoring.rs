//! Answer submission, competency averages, tiers and recommendations.
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::competency::{Competencies, Competency, CompetencyAverages, CompetencyTotals};
use crate::constants::{TIER_DEVELOPING_MIN, TIER_EXCELLENT_MIN, TIER_GOOD_MIN};
use crate::data::{AnswerOption, Scenario, ScenarioCatalog};
use crate::error::TrainingError;
use crate::navigator::resolve_scenario;
use crate::session::Session;

/// Qualitative label for an average score, ordered worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceTier {
    NeedsImprovement,
    Developing,
    Good,
    Excellent,
}

impl PerformanceTier {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NeedsImprovement => "Needs Improvement",
            Self::Developing => "Developing",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lower bounds (inclusive) for each tier above `NeedsImprovement`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierThresholds {
    pub excellent: f32,
    pub good: f32,
    pub developing: f32,
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            excellent: TIER_EXCELLENT_MIN,
            good: TIER_GOOD_MIN,
            developing: TIER_DEVELOPING_MIN,
        }
    }
}

impl TierThresholds {
    #[must_use]
    pub fn tier_for(&self, score: f32) -> PerformanceTier {
        if score >= self.excellent {
            PerformanceTier::Excellent
        } else if score >= self.good {
            PerformanceTier::Good
        } else if score >= self.developing {
            PerformanceTier::Developing
        } else {
            PerformanceTier::NeedsImprovement
        }
    }
}

#[derive(Debug, Error)]
pub enum ScoringConfigError {
    #[error(
        "tier thresholds must descend: excellent {excellent:.2} >= good {good:.2} >= developing {developing:.2}"
    )]
    UnorderedThresholds {
        excellent: f32,
        good: f32,
        developing: f32,
    },
    #[error("scoring config JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Grading configuration for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub tiers: TierThresholds,
    pub tips: Competencies<Vec<String>>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tiers: TierThresholds::default(),
            tips: Competencies {
                technical_judgment: vec![
                    "Review industry best practices for your technology stack".to_string(),
                    "Practice evaluating trade-offs between different technical approaches"
                        .to_string(),
                    "Consider technical implications alongside business requirements".to_string(),
                ],
                stakeholder_management: vec![
                    "Improve communication transparency with all project stakeholders"
                        .to_string(),
                    "Practice presenting technical concepts to non-technical audiences"
                        .to_string(),
                    "Consider how decisions affect different stakeholder groups".to_string(),
                ],
                adaptability: vec![
                    "Practice responding to changing requirements and constraints".to_string(),
                    "Develop contingency plans for your technical decisions".to_string(),
                    "Focus on flexible solutions that can evolve over time".to_string(),
                ],
            },
        }
    }
}

impl ScoringConfig {
    /// Parse a config, filling missing sections from [`ScoringConfig::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the thresholds are not descending.
    pub fn from_json(json: &str) -> Result<Self, ScoringConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns an error if `excellent >= good >= developing` does not hold.
    pub fn validate(&self) -> Result<(), ScoringConfigError> {
        let TierThresholds {
            excellent,
            good,
            developing,
        } = self.tiers;
        if excellent >= good && good >= developing {
            Ok(())
        } else {
            Err(ScoringConfigError::UnorderedThresholds {
                excellent,
                good,
                developing,
            })
        }
    }
}

/// Load the default scoring configuration.
///
/// # Errors
///
/// Never fails today; kept fallible to match asset-backed loaders.
pub fn load_scoring_config() -> Result<ScoringConfig, ScoringConfigError> {
    let cfg = ScoringConfig::default();
    cfg.validate()?;
    Ok(cfg)
}

/// Fold `option`'s scores into `session` and mark `scenario` completed.
///
/// This is the only path that changes competency totals. All checks run
/// before any mutation; resubmitting a completed scenario leaves the totals as they are.
///
/// # Errors
///
/// - [`TrainingError::InvalidOption`] if `option` is not one of `scenario`'s options.
/// - [`TrainingError::InvalidTransition`] if `scenario` is not on the session's track,
///   or no track has been selected.
pub fn submit_answer(
    session: &mut Session,
    scenario: &Scenario,
    option: &AnswerOption,
) -> Result<CompetencyTotals, TrainingError> {
    if !scenario.offers(option) {
        log::warn!(
            "rejected option {} for scenario {}",
            option.id,
            scenario.id
        );
        return Err(TrainingError::InvalidOption {
            scenario_id: scenario.id.clone(),
            option_id: option.id.clone(),
        });
    }
    if session.track() != Some(scenario.track) {
        log::warn!(
            "rejected {} submission on a session tracking {:?}",
            scenario.track,
            session.track()
        );
        return Err(TrainingError::InvalidTransition {
            current: session.track(),
            requested: scenario.track,
            completed: session.completed_count(),
        });
    }
    session.record_completion(&scenario.id, option.scores);
    Ok(session.competency_totals())
}

/// Resolve ids against `catalog`, then [`submit_answer`].
///
/// # Errors
///
/// [`TrainingError::NotFound`] for an unknown scenario, [`TrainingError::InvalidOption`]
/// for an option id the scenario does not offer, plus any [`submit_answer`] failure.
pub fn submit_answer_by_id(
    session: &mut Session,
    catalog: &ScenarioCatalog,
    scenario_id: &str,
    option_id: &str,
) -> Result<CompetencyTotals, TrainingError> {
    let scenario = resolve_scenario(catalog, scenario_id)?;
    let option = scenario
        .option(option_id)
        .ok_or_else(|| TrainingError::InvalidOption {
            scenario_id: scenario_id.to_string(),
            option_id: option_id.to_string(),
        })?;
    submit_answer(session, scenario, option)
}

/// Mean score per competency over completed scenarios; all zero when none are completed.
///
/// The track total is accepted for parity with the dashboard call site and
/// does not affect the result.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_competencies(
    session: &Session,
    _total_scenarios_for_track: usize,
) -> CompetencyAverages {
    let completed = session.completed_count();
    if completed == 0 {
        return CompetencyAverages::default();
    }
    let divisor = completed as f32;
    session
        .competency_totals()
        .map(|total| total as f32 / divisor)
}

/// Tier for an average score using the default thresholds.
#[must_use]
pub fn performance_tier(score: f32) -> PerformanceTier {
    TierThresholds::default().tier_for(score)
}

/// Competency with the lowest average; ties resolve to the earliest in
/// [`Competency::ALL`] (technical judgment, stakeholder management, adaptability).
#[must_use]
pub fn weakest_competency(averages: &CompetencyAverages) -> Competency {
    pick_by(averages, |candidate, best| candidate < best)
}

/// Competency with the highest average, with the same tie priority as
/// [`weakest_competency`].
#[must_use]
pub fn strongest_competency(averages: &CompetencyAverages) -> Competency {
    pick_by(averages, |candidate, best| candidate > best)
}

fn pick_by(averages: &CompetencyAverages, better: impl Fn(f32, f32) -> bool) -> Competency {
    let mut iter = averages.iter();
    let Some(first) = iter.next() else {
        return Competency::TechnicalJudgment;
    };
    iter.fold(first, |best, candidate| {
        if better(candidate.1, best.1) {
            candidate
        } else {
            best
        }
    })
    .0
}

/// Focus area and improvement tips derived from the weakest competency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub area: Competency,
    pub tips: Vec<String>,
}

#[must_use]
pub fn recommendation(averages: &CompetencyAverages, cfg: &ScoringConfig) -> Recommendation {
    let area = weakest_competency(averages);
    Recommendation {
        area,
        tips: cfg.tips.get_ref(area).clone(),
    }
}
