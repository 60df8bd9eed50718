use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;

use solver_game::{
    CatalogLoader, CompetencyAverages, CompetencyTotals, DashboardSummary, PerformanceTier,
    Session, Stage, Track, TrainingEngine, TrainingError, available_scenarios,
    average_competencies, scenarios_for_track, submit_answer, track_progress,
};

use super::policy::AnswerStrategy;

#[derive(Debug, Error)]
pub enum PlaythroughError {
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error("track {0} has no scenarios in the catalog")]
    EmptyTrack(Track),
    #[error("policy {policy} picked option {index} but {scenario_id} offers {available}")]
    OptionOutOfRange {
        policy: &'static str,
        scenario_id: String,
        index: usize,
        available: usize,
    },
    #[error("invariant broken after {scenario_id}: {detail}")]
    Invariant { scenario_id: String, detail: String },
}

fn invariant(scenario_id: &str, detail: impl Into<String>) -> PlaythroughError {
    PlaythroughError::Invariant {
        scenario_id: scenario_id.to_string(),
        detail: detail.into(),
    }
}

/// One answered scenario in a playthrough.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub scenario_id: String,
    pub option_id: String,
    pub policy_name: String,
    pub rationale: Option<String>,
}

/// Outcome of a single completed playthrough of a track.
#[derive(Debug, Clone)]
pub struct PlaythroughSummary {
    pub track: Track,
    pub strategy: AnswerStrategy,
    pub seed: u64,
    pub decisions: Vec<DecisionRecord>,
    pub session: Session,
    pub averages: CompetencyAverages,
    pub overall_tier: PerformanceTier,
    pub dashboard: Option<DashboardSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub track: Track,
    pub strategy: AnswerStrategy,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub final_averages: Option<CompetencyAverages>,
    pub final_tier: Option<PerformanceTier>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

/// Drives full-track playthroughs against an engine and checks session invariants on every step.
pub struct LogicTester<'e, L>
where
    L: CatalogLoader,
{
    engine: &'e TrainingEngine<L>,
    verbose: bool,
}

impl<'e, L> LogicTester<'e, L>
where
    L: CatalogLoader,
{
    pub const fn new(engine: &'e TrainingEngine<L>, verbose: bool) -> Self {
        Self { engine, verbose }
    }

    pub fn run_track(
        &self,
        track: Track,
        strategy: AnswerStrategy,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.verbose {
                println!(
                    "🧪 Testing track: {} (strategy: {} seed: {})",
                    track.label().bright_white(),
                    strategy,
                    seed
                );
            }

            results.push(self.run_single(track, strategy, seed, iterations));
        }

        results
    }

    fn run_single(
        &self,
        track: Track,
        strategy: AnswerStrategy,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();
        let mut last_summary: Option<PlaythroughSummary> = None;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.run_playthrough(track, strategy, iteration_seed) {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);

                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) answered:{} tier:{} path: {}",
                            i + 1,
                            iterations,
                            summary.decisions.len(),
                            summary.overall_tier,
                            summarize_decision_path(&summary.decisions)
                        );
                    }
                    last_summary = Some(summary);
                }
                Err(err) => {
                    log::warn!("playthrough failed: {err}");
                    failures.push(format!(
                        "Iteration {} (track {}, strategy {}, seed {}): {}",
                        i + 1,
                        track,
                        strategy.key(),
                        iteration_seed,
                        err
                    ));

                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.to_string().red()
                        );
                    }
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: format!("{} / {}", track.title(), strategy.label()),
            track,
            strategy,
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            final_averages: last_summary.as_ref().map(|s| s.averages),
            final_tier: last_summary.as_ref().map(|s| s.overall_tier),
            average_duration,
            performance_data,
        }
    }

    /// Play every scenario of `track` once with `strategy`, the way a user
    /// would move through the screens, and verify the session after each answer.
    ///
    /// # Errors
    ///
    /// Returns the first core error or broken invariant encountered.
    pub fn run_playthrough(
        &self,
        track: Track,
        strategy: AnswerStrategy,
        seed: u64,
    ) -> Result<PlaythroughSummary, PlaythroughError> {
        let catalog = self.engine.catalog();
        let total = scenarios_for_track(catalog, track).count();
        if total == 0 {
            return Err(PlaythroughError::EmptyTrack(track));
        }
        let off_track = catalog
            .iter()
            .filter(|s| s.track != track)
            .find_map(|s| s.options.first().map(|o| (s, o)));
        let other_track = Track::ALL.into_iter().find(|t| *t != track);

        let mut session = self.engine.create_session();
        advance(&mut session, Stage::TrackSelection, "-")?;
        session.choose_track(track)?;

        let mut policy = strategy.create_policy(seed);
        let mut expected = CompetencyTotals::default();
        let mut decisions = Vec::new();

        loop {
            let next = available_scenarios(catalog, &session).next();
            let Some(scenario) = next else {
                break;
            };
            advance(&mut session, Stage::Scenario, &scenario.id)?;

            let decision = policy.pick_option(&session, scenario);
            let option = scenario.options.get(decision.option_index).ok_or_else(|| {
                PlaythroughError::OptionOutOfRange {
                    policy: policy.name(),
                    scenario_id: scenario.id.clone(),
                    index: decision.option_index,
                    available: scenario.options.len(),
                }
            })?;

            let totals = submit_answer(&mut session, scenario, option)?;
            expected += option.scores;
            if totals != expected {
                return Err(invariant(
                    &scenario.id,
                    format!("totals {totals:?} differ from summed scores {expected:?}"),
                ));
            }
            if session.completed_count() != decisions.len() + 1 {
                return Err(invariant(
                    &scenario.id,
                    format!(
                        "{} completions recorded for {} answers",
                        session.completed_count(),
                        decisions.len() + 1
                    ),
                ));
            }

            let snapshot = session.clone();
            submit_answer(&mut session, scenario, option)?;
            if session != snapshot {
                return Err(invariant(&scenario.id, "resubmission changed the session"));
            }
            if let Some((other, other_option)) = off_track
                && (submit_answer(&mut session, other, other_option).is_ok()
                    || session != snapshot)
            {
                return Err(invariant(
                    &scenario.id,
                    format!("cross-track submission of {} was accepted", other.id),
                ));
            }
            if let Some(other) = other_track
                && (session.select_track(other).is_ok() || session != snapshot)
            {
                return Err(invariant(
                    &scenario.id,
                    format!("switch to {other} allowed after a completion"),
                ));
            }

            advance(&mut session, Stage::Feedback, &scenario.id)?;
            decisions.push(DecisionRecord {
                scenario_id: scenario.id.clone(),
                option_id: option.id.clone(),
                policy_name: policy.name().to_string(),
                rationale: decision.rationale,
            });
        }

        let progress = track_progress(catalog, &session);
        if !progress.is_finished() || progress.total != total {
            return Err(invariant(
                "-",
                format!("progress {}/{} after the loop", progress.completed, progress.total),
            ));
        }

        let averages = average_competencies(&session, total);
        let mean = averages.iter().map(|(_, v)| v).sum::<f32>() / 3.0;
        let overall_tier = self.engine.scoring().tiers.tier_for(mean);
        let dashboard = self.engine.dashboard(&session);

        Ok(PlaythroughSummary {
            track,
            strategy,
            seed,
            decisions,
            session,
            averages,
            overall_tier,
            dashboard,
        })
    }
}

fn advance(session: &mut Session, next: Stage, scenario_id: &str) -> Result<(), PlaythroughError> {
    if !session.stage().can_transition_to(next) {
        return Err(invariant(
            scenario_id,
            format!("stage {} cannot move to {next}", session.stage()),
        ));
    }
    session.set_stage(next);
    Ok(())
}

fn summarize_decision_path(decisions: &[DecisionRecord]) -> String {
    if decisions.is_empty() {
        return "no decisions recorded".to_string();
    }

    decisions
        .iter()
        .map(|entry| {
            let rationale = entry
                .rationale
                .as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or("-");
            format!(
                "{} -> {} [{}] reason {}",
                entry.scenario_id, entry.option_id, entry.policy_name, rationale
            )
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let micros: Vec<u128> = durations.iter().map(Duration::as_micros).collect();
        micros.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros_vec
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_game::{Competency, ScenarioCatalog, StaticCatalogLoader};

    fn engine() -> TrainingEngine<StaticCatalogLoader> {
        TrainingEngine::new(StaticCatalogLoader).unwrap()
    }

    #[test]
    fn best_strategy_reaches_top_tier_on_ai_track() {
        let engine = engine();
        let tester = LogicTester::new(&engine, false);
        let summary = tester
            .run_playthrough(Track::Ai, AnswerStrategy::Best, 1)
            .unwrap();
        assert_eq!(summary.decisions.len(), 1);
        assert_eq!(summary.decisions[0].option_id, "ai-bias-2");
        assert_eq!(summary.averages, CompetencyAverages::new(9.0, 8.0, 8.0));
        assert_eq!(summary.overall_tier, PerformanceTier::Excellent);
        assert_eq!(summary.session.stage(), Stage::Feedback);

        let dashboard = summary.dashboard.unwrap();
        assert_eq!(dashboard.top_area, Some(Competency::TechnicalJudgment));
    }

    #[test]
    fn every_strategy_passes_every_track() {
        let engine = engine();
        let tester = LogicTester::new(&engine, false);
        for track in Track::ALL {
            for strategy in AnswerStrategy::ALL {
                let results = tester.run_track(track, strategy, &[3, 11], 4);
                assert_eq!(results.len(), 2);
                for result in results {
                    assert!(result.passed, "{}: {:?}", result.scenario_name, result.failures);
                    assert_eq!(result.successful_iterations, 4);
                    assert!(result.final_tier.is_some());
                }
            }
        }
    }

    #[test]
    fn empty_track_is_reported_as_failure() {
        struct AiOnly;
        impl CatalogLoader for AiOnly {
            type Error = solver_game::CatalogError;
            fn load_catalog(&self) -> Result<ScenarioCatalog, Self::Error> {
                let full = ScenarioCatalog::load_from_static()?;
                ScenarioCatalog::from_scenarios(
                    full.iter().filter(|s| s.track == Track::Ai).cloned().collect(),
                )
            }
        }

        let engine = TrainingEngine::new(AiOnly).unwrap();
        let tester = LogicTester::new(&engine, false);
        let result = tester
            .run_track(Track::Salesforce, AnswerStrategy::First, &[1], 2)
            .remove(0);
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("no scenarios"));
        assert!(result.final_averages.is_none());
        assert_eq!(result.average_duration, Duration::ZERO);
    }

    #[test]
    fn results_serialize_durations_as_micros() {
        let engine = engine();
        let tester = LogicTester::new(&engine, false);
        let mut result = tester
            .run_track(Track::ServiceNow, AnswerStrategy::Coach, &[5], 1)
            .remove(0);
        result.performance_data = vec![Duration::from_micros(1500)];
        result.average_duration = Duration::from_micros(1500);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 1500);
        assert_eq!(json["strategy"], "coach");
        assert_eq!(json["track"], "servicenow");

        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.performance_data, vec![Duration::from_micros(1500)]);
    }

    #[test]
    fn decision_path_summary_lists_choices() {
        let decisions = vec![DecisionRecord {
            scenario_id: "ai-bias".to_string(),
            option_id: "ai-bias-2".to_string(),
            policy_name: "Best Answer".to_string(),
            rationale: None,
        }];
        assert_eq!(
            summarize_decision_path(&decisions),
            "ai-bias -> ai-bias-2 [Best Answer] reason -"
        );
        assert_eq!(summarize_decision_path(&[]), "no decisions recorded");
    }
}
