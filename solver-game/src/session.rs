//! Per-user session state: track selection, stage, completions and totals.
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::competency::{Competency, CompetencyTotals, OptionScores};
use crate::constants::SCORE_MAX;
use crate::error::TrainingError;
use crate::stage::Stage;
use crate::track::Track;

/// Mutable progress record for a single user.
///
/// Every completed scenario contributes exactly one option's scores to
/// `competency_totals`; [`Session::record_completion`] is the only place
/// the two are updated, and it updates both or neither. Restored snapshots
/// are checked against the same rules before they become a `Session`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Session {
    track: Option<Track>,
    stage: Stage,
    completed_scenario_ids: Vec<String>,
    competency_totals: CompetencyTotals,
}

/// Reasons a snapshot cannot be restored into a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("scenario '{0}' is listed as completed more than once")]
    DuplicateCompletion(String),
    #[error("{completed} completion(s) recorded without a selected track")]
    CompletionsWithoutTrack { completed: usize },
    #[error("{competency} total {total} exceeds {max} for {completed} completion(s)")]
    TotalOutOfRange {
        competency: Competency,
        total: u32,
        max: u64,
        completed: usize,
    },
}

/// Wire layout of a session, validated before it is trusted.
#[derive(Deserialize)]
struct SessionSnapshot {
    track: Option<Track>,
    stage: Stage,
    completed_scenario_ids: Vec<String>,
    competency_totals: CompetencyTotals,
}

impl SessionSnapshot {
    fn validate(&self) -> Result<(), SnapshotError> {
        let completed = self.completed_scenario_ids.len();
        if self.track.is_none() && completed > 0 {
            return Err(SnapshotError::CompletionsWithoutTrack { completed });
        }
        for (idx, id) in self.completed_scenario_ids.iter().enumerate() {
            if self.completed_scenario_ids[..idx].contains(id) {
                return Err(SnapshotError::DuplicateCompletion(id.clone()));
            }
        }
        let max = u64::try_from(completed)
            .unwrap_or(u64::MAX)
            .saturating_mul(u64::from(SCORE_MAX));
        for (competency, total) in self.competency_totals.iter() {
            if u64::from(total) > max {
                return Err(SnapshotError::TotalOutOfRange {
                    competency,
                    total,
                    max,
                    completed,
                });
            }
        }
        Ok(())
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let snapshot = SessionSnapshot::deserialize(deserializer)?;
        snapshot.validate().map_err(serde::de::Error::custom)?;
        Ok(Self {
            track: snapshot.track,
            stage: snapshot.stage,
            completed_scenario_ids: snapshot.completed_scenario_ids,
            competency_totals: snapshot.competency_totals,
        })
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn track(&self) -> Option<Track> {
        self.track
    }

    #[must_use]
    pub const fn stage(&self) -> Stage {
        self.stage
    }

    /// Completed scenario ids in the order they were completed.
    #[must_use]
    pub fn completed_scenario_ids(&self) -> &[String] {
        &self.completed_scenario_ids
    }

    #[must_use]
    pub const fn competency_totals(&self) -> CompetencyTotals {
        self.competency_totals
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_scenario_ids.len()
    }

    #[must_use]
    pub fn is_completed(&self, scenario_id: &str) -> bool {
        self.completed_scenario_ids.iter().any(|id| id == scenario_id)
    }

    /// Set the active track.
    ///
    /// Re-selecting the current track is a no-op. Switching to another track is
    /// allowed only while nothing has been completed, so scores from different
    /// tracks never mix.
    ///
    /// # Errors
    ///
    /// Returns [`TrainingError::InvalidTransition`] when switching tracks after progress exists.
    pub fn select_track(&mut self, track: Track) -> Result<(), TrainingError> {
        match self.track {
            Some(current) if current == track => Ok(()),
            Some(current) if !self.completed_scenario_ids.is_empty() => {
                log::warn!(
                    "rejected track switch {current} -> {track} with {} completion(s)",
                    self.completed_scenario_ids.len()
                );
                Err(TrainingError::InvalidTransition {
                    current: Some(current),
                    requested: track,
                    completed: self.completed_scenario_ids.len(),
                })
            }
            _ => {
                log::info!("track selected: {track}");
                self.track = Some(track);
                Ok(())
            }
        }
    }

    /// Select a track and continue to the tutorial, as the track picker does.
    ///
    /// # Errors
    ///
    /// Propagates [`Session::select_track`] failures; the stage is left untouched on error.
    pub fn choose_track(&mut self, track: Track) -> Result<(), TrainingError> {
        self.select_track(track)?;
        self.set_stage(Stage::Tutorial);
        Ok(())
    }

    /// Move to `stage` unconditionally. Off-path transitions are logged, not refused.
    pub fn set_stage(&mut self, stage: Stage) {
        if !self.stage.can_transition_to(stage) {
            log::debug!("off-path stage transition {} -> {stage}", self.stage);
        }
        self.stage = stage;
    }

    /// Record `scenario_id` as completed and fold `scores` into the totals.
    ///
    /// Returns `false` without touching anything when the id is already
    /// recorded, so a scenario is never scored twice.
    pub fn record_completion(&mut self, scenario_id: &str, scores: OptionScores) -> bool {
        if self.is_completed(scenario_id) {
            log::debug!("scenario {scenario_id} already completed; ignoring");
            return false;
        }
        self.completed_scenario_ids.push(scenario_id.to_string());
        self.competency_totals += scores;
        log::info!(
            "completed {scenario_id} ({} total) scores tj:{} sm:{} ad:{}",
            self.completed_scenario_ids.len(),
            scores.technical_judgment,
            scores.stakeholder_management,
            scores.adaptability
        );
        true
    }

    /// Serialize to the snapshot layout used by callers that want to keep a session.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a session produced by [`Session::to_json`].
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the snapshot layout, or if it
    /// breaks a session rule (see [`SnapshotError`]).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
