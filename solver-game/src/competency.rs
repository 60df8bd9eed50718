//! Competency dimensions and per-dimension value triples.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

/// One of the three scored dimensions.
///
/// Declaration order doubles as the tie-break priority used when picking
/// the weakest or strongest competency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competency {
    TechnicalJudgment,
    StakeholderManagement,
    Adaptability,
}

impl Competency {
    pub const ALL: [Self; 3] = [
        Self::TechnicalJudgment,
        Self::StakeholderManagement,
        Self::Adaptability,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TechnicalJudgment => "Technical Judgment",
            Self::StakeholderManagement => "Stakeholder Management",
            Self::Adaptability => "Adaptability",
        }
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A value per competency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Competencies<T> {
    #[serde(default)]
    pub technical_judgment: T,
    #[serde(default)]
    pub stakeholder_management: T,
    #[serde(default)]
    pub adaptability: T,
}

/// Scores carried by a single answer option, each in `0..=10`.
pub type OptionScores = Competencies<u8>;
/// Running sums folded from submitted answers.
pub type CompetencyTotals = Competencies<u32>;
/// Per-competency means over completed scenarios.
pub type CompetencyAverages = Competencies<f32>;

impl<T> Competencies<T> {
    #[must_use]
    pub const fn get_ref(&self, competency: Competency) -> &T {
        match competency {
            Competency::TechnicalJudgment => &self.technical_judgment,
            Competency::StakeholderManagement => &self.stakeholder_management,
            Competency::Adaptability => &self.adaptability,
        }
    }
}

impl<T: Copy> Competencies<T> {
    #[must_use]
    pub const fn new(technical_judgment: T, stakeholder_management: T, adaptability: T) -> Self {
        Self {
            technical_judgment,
            stakeholder_management,
            adaptability,
        }
    }

    #[must_use]
    pub const fn get(&self, competency: Competency) -> T {
        match competency {
            Competency::TechnicalJudgment => self.technical_judgment,
            Competency::StakeholderManagement => self.stakeholder_management,
            Competency::Adaptability => self.adaptability,
        }
    }

    #[must_use]
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Competencies<U> {
        Competencies {
            technical_judgment: f(self.technical_judgment),
            stakeholder_management: f(self.stakeholder_management),
            adaptability: f(self.adaptability),
        }
    }

    /// Pairs each competency with its value, in priority order.
    pub fn iter(&self) -> impl Iterator<Item = (Competency, T)> + '_ {
        Competency::ALL.into_iter().map(|c| (c, self.get(c)))
    }
}

impl OptionScores {
    /// Sum of the three scores.
    #[must_use]
    pub fn total(&self) -> u32 {
        u32::from(self.technical_judgment)
            + u32::from(self.stakeholder_management)
            + u32::from(self.adaptability)
    }
}

/// Saturates at `u32::MAX` instead of wrapping.
impl AddAssign<OptionScores> for CompetencyTotals {
    fn add_assign(&mut self, rhs: OptionScores) {
        self.technical_judgment = self
            .technical_judgment
            .saturating_add(u32::from(rhs.technical_judgment));
        self.stakeholder_management = self
            .stakeholder_management
            .saturating_add(u32::from(rhs.stakeholder_management));
        self.adaptability = self.adaptability.saturating_add(u32::from(rhs.adaptability));
    }
}
