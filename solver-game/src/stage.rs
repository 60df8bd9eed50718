use serde::{Deserialize, Serialize};
use std::fmt;

/// Screen the session is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Stage {
    #[default]
    Intro,
    TrackSelection,
    Tutorial,
    Scenario,
    Feedback,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::Intro,
        Self::TrackSelection,
        Self::Tutorial,
        Self::Scenario,
        Self::Feedback,
    ];

    /// Whether `next` is on the guarded path
    /// `intro -> trackSelection -> tutorial -> scenario <-> feedback`.
    ///
    /// Staying on the current stage is always allowed.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Intro, Self::Intro | Self::TrackSelection)
                | (Self::TrackSelection, Self::TrackSelection | Self::Tutorial)
                | (Self::Tutorial, Self::Tutorial | Self::Scenario)
                | (Self::Scenario | Self::Feedback, Self::Scenario | Self::Feedback)
        )
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::TrackSelection => "trackSelection",
            Self::Tutorial => "tutorial",
            Self::Scenario => "scenario",
            Self::Feedback => "feedback",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
