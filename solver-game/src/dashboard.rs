//! Progress dashboard summary
use serde::{Deserialize, Serialize};

use crate::competency::{Competency, CompetencyAverages};
use crate::data::ScenarioCatalog;
use crate::navigator::{TrackProgress, track_progress};
use crate::scoring::{
    PerformanceTier, Recommendation, ScoringConfig, average_competencies, recommendation,
    strongest_competency,
};
use crate::session::Session;
use crate::track::Track;

/// One competency row of the assessment panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompetencyLine {
    pub competency: Competency,
    pub average: f32,
    pub tier: PerformanceTier,
    /// Average scaled to 0..=100 for progress bars.
    pub percent: f32,
}

/// Everything the progress dashboard displays for a session.
///
/// Assessment sections stay `None` until at least one scenario is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub track: Track,
    pub progress: TrackProgress,
    pub averages: CompetencyAverages,
    pub assessment: Option<Vec<CompetencyLine>>,
    pub top_area: Option<Competency>,
    pub recommendation: Option<Recommendation>,
}

impl DashboardSummary {
    #[must_use]
    pub const fn has_results(&self) -> bool {
        self.progress.completed > 0
    }
}

/// Build the dashboard for `session`, or `None` before a track is selected.
#[must_use]
pub fn dashboard_summary(
    catalog: &ScenarioCatalog,
    session: &Session,
    cfg: &ScoringConfig,
) -> Option<DashboardSummary> {
    let track = session.track()?;
    let progress = track_progress(catalog, session);
    let averages = average_competencies(session, progress.total);

    let (assessment, top_area, advice) = if progress.completed == 0 {
        (None, None, None)
    } else {
        let lines = averages
            .iter()
            .map(|(competency, average)| CompetencyLine {
                competency,
                average,
                tier: cfg.tiers.tier_for(average),
                percent: average * 10.0,
            })
            .collect();
        (
            Some(lines),
            Some(strongest_competency(&averages)),
            Some(recommendation(&averages, cfg)),
        )
    };

    Some(DashboardSummary {
        track,
        progress,
        averages,
        assessment,
        top_area,
        recommendation: advice,
    })
}
