//! Tech Scenario Solver core
//!
//! Platform-agnostic session and scoring logic for the scenario training app.
//! This crate holds the state machine and grading rules without UI or
//! platform-specific dependencies; presentation layers call into it.

pub mod competency;
pub mod constants;
pub mod dashboard;
pub mod data;
pub mod error;
pub mod navigator;
pub mod scoring;
pub mod session;
pub mod stage;
pub mod track;

// Re-export commonly used types
pub use competency::{
    Competencies, Competency, CompetencyAverages, CompetencyTotals, OptionScores,
};
pub use dashboard::{CompetencyLine, DashboardSummary, dashboard_summary};
pub use data::{AnswerOption, CatalogError, Scenario, ScenarioCatalog};
pub use error::TrainingError;
pub use navigator::{
    TrackProgress, available_scenarios, resolve_scenario, scenarios_for_track, track_progress,
};
pub use scoring::{
    PerformanceTier, Recommendation, ScoringConfig, ScoringConfigError, TierThresholds,
    average_competencies, load_scoring_config, performance_tier, recommendation,
    strongest_competency, submit_answer, submit_answer_by_id, weakest_competency,
};
pub use session::{Session, SnapshotError};
pub use stage::Stage;
pub use track::{Track, UnknownTrack};

/// Trait for abstracting catalog loading
/// Platform-specific implementations should provide this
pub trait CatalogLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the scenario catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or violates catalog invariants.
    fn load_catalog(&self) -> Result<ScenarioCatalog, Self::Error>;
}

/// Loader serving the catalog bundled with this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticCatalogLoader;

impl CatalogLoader for StaticCatalogLoader {
    type Error = CatalogError;

    fn load_catalog(&self) -> Result<ScenarioCatalog, Self::Error> {
        ScenarioCatalog::load_from_static()
    }
}

/// Owns a loaded catalog and hands out fresh sessions against it.
pub struct TrainingEngine<L>
where
    L: CatalogLoader,
{
    loader: L,
    catalog: ScenarioCatalog,
    scoring: ScoringConfig,
}

impl<L> TrainingEngine<L>
where
    L: CatalogLoader,
{
    /// Load the catalog through `loader` and pair it with the default scoring config.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn new(loader: L) -> Result<Self, anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        let catalog = loader.load_catalog().map_err(Into::into)?;
        let scoring = load_scoring_config()?;
        log::info!("catalog loaded with {} scenario(s)", catalog.len());
        Ok(Self {
            loader,
            catalog,
            scoring,
        })
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Re-read the catalog from the loader. Existing sessions keep their ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded; the previous catalog stays in place.
    pub fn reload(&mut self) -> Result<(), anyhow::Error>
    where
        L::Error: Into<anyhow::Error>,
    {
        self.catalog = self.loader.load_catalog().map_err(Into::into)?;
        Ok(())
    }

    /// A fresh session at the intro stage.
    #[must_use]
    pub fn create_session(&self) -> Session {
        Session::new()
    }

    #[must_use]
    pub const fn catalog(&self) -> &ScenarioCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn scoring(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Dashboard for `session` against this engine's catalog and scoring config.
    #[must_use]
    pub fn dashboard(&self, session: &Session) -> Option<DashboardSummary> {
        dashboard_summary(&self.catalog, session, &self.scoring)
    }
}
