use thiserror::Error;

use crate::track::Track;

/// Validation failures raised by session, navigator and scoring operations.
///
/// None of these are transient; callers should surface them rather than retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrainingError {
    #[error(
        "cannot move session from track {} to {requested} after {completed} completed scenario(s)",
        track_label(.current)
    )]
    InvalidTransition {
        current: Option<Track>,
        requested: Track,
        completed: usize,
    },
    #[error("option '{option_id}' is not offered by scenario '{scenario_id}'")]
    InvalidOption {
        scenario_id: String,
        option_id: String,
    },
    #[error("scenario '{0}' not found in catalog")]
    NotFound(String),
}

impl TrainingError {
    /// True for failures that indicate a defect in the calling layer (stale ids,
    /// options taken from the wrong scenario) rather than a user decision.
    #[must_use]
    pub const fn is_caller_defect(&self) -> bool {
        match self {
            Self::InvalidOption { .. } | Self::NotFound(_) => true,
            Self::InvalidTransition { .. } => false,
        }
    }
}

fn track_label(track: &Option<Track>) -> &'static str {
    track.map_or("<none>", Track::key)
}
