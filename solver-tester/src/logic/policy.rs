use std::fmt;
use std::str::FromStr;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use solver_game::{Scenario, Session, average_competencies, weakest_competency};
use thiserror::Error;

/// Decision returned by an [`AnswerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub option_index: usize,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(option_index: usize, rationale: Option<String>) -> Self {
        Self {
            option_index,
            rationale,
        }
    }
}

/// Policy interface for automated playthroughs.
pub trait AnswerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Select an option of `scenario` given the session so far.
    fn pick_option(&mut self, session: &Session, scenario: &Scenario) -> PolicyDecision;
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected best, worst, first, coach or random)")]
pub struct UnknownStrategy(pub String);

/// Built-in answer strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStrategy {
    Best,
    Worst,
    First,
    Coach,
    Random,
}

impl AnswerStrategy {
    pub const ALL: [Self; 5] = [
        Self::Best,
        Self::Worst,
        Self::First,
        Self::Coach,
        Self::Random,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Worst => "worst",
            Self::First => "first",
            Self::Coach => "coach",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Best => "Best Answer",
            Self::Worst => "Worst Answer",
            Self::First => "First Listed",
            Self::Coach => "Coach",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn AnswerPolicy + Send> {
        match self {
            Self::Best => Box::new(BestPolicy),
            Self::Worst => Box::new(WorstPolicy),
            Self::First => Box::new(FirstPolicy),
            Self::Coach => Box::new(CoachPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for AnswerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AnswerStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownStrategy(s.to_string()))
    }
}

struct BestPolicy;
struct WorstPolicy;
struct FirstPolicy;
struct CoachPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Index of the first option maximizing `score`.
fn first_max_by(scenario: &Scenario, score: impl Fn(usize) -> u32) -> (usize, u32) {
    (0..scenario.options.len())
        .map(|idx| (idx, score(idx)))
        .fold((0, 0), |best, candidate| {
            if candidate.1 > best.1 {
                candidate
            } else {
                best
            }
        })
}

impl AnswerPolicy for BestPolicy {
    fn name(&self) -> &'static str {
        "Best Answer"
    }

    fn pick_option(&mut self, _session: &Session, scenario: &Scenario) -> PolicyDecision {
        let (idx, total) = first_max_by(scenario, |idx| scenario.options[idx].scores.total());
        PolicyDecision::new(idx, Some(format!("total {total}")))
    }
}

impl AnswerPolicy for WorstPolicy {
    fn name(&self) -> &'static str {
        "Worst Answer"
    }

    fn pick_option(&mut self, _session: &Session, scenario: &Scenario) -> PolicyDecision {
        let (idx, total) = scenario
            .options
            .iter()
            .enumerate()
            .map(|(idx, option)| (idx, option.scores.total()))
            .fold(None, |best: Option<(usize, u32)>, candidate| match best {
                Some(best) if best.1 <= candidate.1 => Some(best),
                _ => Some(candidate),
            })
            .unwrap_or((0, 0));
        PolicyDecision::new(idx, Some(format!("total {total}")))
    }
}

impl AnswerPolicy for FirstPolicy {
    fn name(&self) -> &'static str {
        "First Listed"
    }

    fn pick_option(&mut self, _session: &Session, _scenario: &Scenario) -> PolicyDecision {
        PolicyDecision::new(0, None)
    }
}

impl AnswerPolicy for CoachPolicy {
    fn name(&self) -> &'static str {
        "Coach"
    }

    fn pick_option(&mut self, session: &Session, scenario: &Scenario) -> PolicyDecision {
        let focus = weakest_competency(&average_competencies(session, 0));
        let (idx, score) = first_max_by(scenario, |idx| {
            u32::from(scenario.options[idx].scores.get(focus))
        });
        PolicyDecision::new(idx, Some(format!("{focus} {score}")))
    }
}

impl AnswerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn pick_option(&mut self, _session: &Session, scenario: &Scenario) -> PolicyDecision {
        if scenario.options.is_empty() {
            return PolicyDecision::new(0, Some("no options".to_string()));
        }
        let idx = self.rng.gen_range(0..scenario.options.len());
        PolicyDecision::new(idx, Some(format!("roll {idx}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solver_game::{AnswerOption, OptionScores, Track};

    fn option(id: &str, tj: u8, sm: u8, ad: u8) -> AnswerOption {
        AnswerOption {
            id: id.to_string(),
            text: String::new(),
            scores: OptionScores::new(tj, sm, ad),
            feedback: String::new(),
        }
    }

    fn scenario() -> Scenario {
        Scenario {
            id: "s".to_string(),
            track: Track::Ai,
            title: String::new(),
            description: String::new(),
            context: String::new(),
            options: vec![
                option("s-1", 2, 9, 1),
                option("s-2", 8, 8, 8),
                option("s-3", 9, 1, 2),
                option("s-4", 8, 8, 8),
            ],
        }
    }

    fn pick(strategy: AnswerStrategy, session: &Session) -> usize {
        strategy
            .create_policy(7)
            .pick_option(session, &scenario())
            .option_index
    }

    #[test]
    fn best_and_worst_break_ties_on_earliest() {
        let session = Session::new();
        assert_eq!(pick(AnswerStrategy::Best, &session), 1);
        assert_eq!(pick(AnswerStrategy::Worst, &session), 0);
        assert_eq!(pick(AnswerStrategy::First, &session), 0);
    }

    #[test]
    fn coach_targets_weakest_competency() {
        let mut session = Session::new();
        session.select_track(Track::Ai).unwrap();
        // Empty session: all averages tie, technical judgment leads.
        assert_eq!(pick(AnswerStrategy::Coach, &session), 2);

        session.record_completion("other", OptionScores::new(9, 2, 9));
        assert_eq!(pick(AnswerStrategy::Coach, &session), 0);
    }

    #[test]
    fn random_is_reproducible_per_seed() {
        let session = Session::new();
        let scenario = scenario();
        let picks = |seed| {
            let mut policy = AnswerStrategy::Random.create_policy(seed);
            (0..8)
                .map(|_| policy.pick_option(&session, &scenario).option_index)
                .collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
        assert!(picks(42).iter().all(|&idx| idx < 4));
    }

    #[test]
    fn strategies_parse_from_keys() {
        assert_eq!("coach".parse::<AnswerStrategy>(), Ok(AnswerStrategy::Coach));
        assert_eq!(" BEST ".parse::<AnswerStrategy>(), Ok(AnswerStrategy::Best));
        assert!("greedy".parse::<AnswerStrategy>().is_err());
        for strategy in AnswerStrategy::ALL {
            assert_eq!(strategy.key().parse::<AnswerStrategy>(), Ok(strategy));
        }
    }
}
