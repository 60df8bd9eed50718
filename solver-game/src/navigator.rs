//! Scenario lookup and per-track progress.
use serde::{Deserialize, Serialize};

use crate::data::{Scenario, ScenarioCatalog};
use crate::error::TrainingError;
use crate::session::Session;
use crate::track::Track;

/// Scenarios offered to `track`, in catalog order.
pub fn scenarios_for_track(
    catalog: &ScenarioCatalog,
    track: Track,
) -> impl Iterator<Item = &Scenario> + '_ {
    catalog.iter().filter(move |s| s.track == track)
}

/// Scenarios on the session's track that have not been completed yet.
///
/// Yields nothing until a track is selected.
pub fn available_scenarios<'c, 's>(
    catalog: &'c ScenarioCatalog,
    session: &'s Session,
) -> impl Iterator<Item = &'c Scenario> + use<'c, 's> {
    let track = session.track();
    catalog
        .iter()
        .filter(move |s| track == Some(s.track) && !session.is_completed(&s.id))
}

/// Look up a scenario by id.
///
/// # Errors
///
/// Returns [`TrainingError::NotFound`] when the id is absent; ids normally come
/// from [`available_scenarios`], so a miss points at the caller.
pub fn resolve_scenario<'a>(
    catalog: &'a ScenarioCatalog,
    id: &str,
) -> Result<&'a Scenario, TrainingError> {
    catalog.get(id).ok_or_else(|| {
        log::warn!("scenario lookup miss: {id}");
        TrainingError::NotFound(id.to_string())
    })
}

/// Completion counts for the session's active track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: f32,
}

impl TrackProgress {
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}

#[must_use]
pub fn track_progress(catalog: &ScenarioCatalog, session: &Session) -> TrackProgress {
    let total = session
        .track()
        .map_or(0, |track| scenarios_for_track(catalog, track).count());
    let completed = session.completed_count();
    #[allow(clippy::cast_precision_loss)]
    let percent = if total == 0 {
        0.0
    } else {
        (completed as f32 / total as f32) * 100.0
    };
    TrackProgress {
        completed,
        total,
        percent,
    }
}
