use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::competency::OptionScores;
use crate::constants::{DEFAULT_CATALOG_DATA, SCORE_MAX};
use crate::track::Track;

/// A selectable answer within a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub scores: OptionScores,
    #[serde(default)]
    pub feedback: String,
}

/// A narrative decision point offered to one track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub track: Track,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

impl Scenario {
    #[must_use]
    pub fn option(&self, option_id: &str) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    /// Whether `option` is one of this scenario's options (id and content).
    #[must_use]
    pub fn offers(&self, option: &AnswerOption) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Invariant violations detected while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate scenario id '{0}'")]
    DuplicateScenario(String),
    #[error("scenario '{scenario_id}' lists option '{option_id}' more than once")]
    DuplicateOption {
        scenario_id: String,
        option_id: String,
    },
    #[error("scenario '{0}' has no options")]
    NoOptions(String),
    #[error("option '{option_id}' in scenario '{scenario_id}' scores {value}, above 10")]
    ScoreOutOfRange {
        scenario_id: String,
        option_id: String,
        value: u8,
    },
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    scenarios: Vec<Scenario>,
}

/// Immutable, validated set of scenarios in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            scenarios: Vec::new(),
        }
    }

    /// Validate and wrap pre-parsed scenarios.
    ///
    /// # Errors
    ///
    /// Returns an error if ids collide, a scenario has no options, or a score exceeds 10.
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self, CatalogError> {
        validate(&scenarios)?;
        Ok(Self { scenarios })
    }

    /// Load a catalog from a JSON string of the form `{"scenarios": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed or the scenarios break catalog invariants.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Self::from_scenarios(file.scenarios)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    ///
    /// Returns an error only if the bundled asset is corrupt.
    pub fn load_from_static() -> Result<Self, CatalogError> {
        Self::from_json(DEFAULT_CATALOG_DATA)
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Scenario> {
        self.scenarios.iter()
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

impl<'a> IntoIterator for &'a ScenarioCatalog {
    type Item = &'a Scenario;
    type IntoIter = std::slice::Iter<'a, Scenario>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate(scenarios: &[Scenario]) -> Result<(), CatalogError> {
    let mut seen = HashSet::with_capacity(scenarios.len());
    for scenario in scenarios {
        if !seen.insert(scenario.id.as_str()) {
            return Err(CatalogError::DuplicateScenario(scenario.id.clone()));
        }
        if scenario.options.is_empty() {
            return Err(CatalogError::NoOptions(scenario.id.clone()));
        }
        let mut option_ids = HashSet::with_capacity(scenario.options.len());
        for option in &scenario.options {
            if !option_ids.insert(option.id.as_str()) {
                return Err(CatalogError::DuplicateOption {
                    scenario_id: scenario.id.clone(),
                    option_id: option.id.clone(),
                });
            }
            if let Some((_, value)) = option.scores.iter().find(|(_, v)| *v > SCORE_MAX) {
                return Err(CatalogError::ScoreOutOfRange {
                    scenario_id: scenario.id.clone(),
                    option_id: option.id.clone(),
                    value,
                });
            }
        }
    }
    Ok(())
}
