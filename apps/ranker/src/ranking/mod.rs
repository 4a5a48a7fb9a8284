//! Ranking — pure, stateless presentation transforms over a candidate list.
//!
//! Sorting is descending and stable. Tiers are fixed brackets of `overall_score`
//! with an inclusive lower and exclusive upper bound.

use serde::{Deserialize, Serialize};

use crate::models::analysis::CandidateScore;

pub mod export;

/// Score field used to order candidates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreDimension {
    #[default]
    Overall,
    Technical,
    Experience,
    Cultural,
    Match,
}

impl ScoreDimension {
    pub fn value(self, candidate: &CandidateScore) -> f64 {
        match self {
            ScoreDimension::Overall => candidate.overall_score,
            ScoreDimension::Technical => candidate.technical_score,
            ScoreDimension::Experience => candidate.experience_score,
            ScoreDimension::Cultural => candidate.cultural_score,
            ScoreDimension::Match => candidate.match_percentage,
        }
    }
}

/// Named score bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Legendary, // ≥ 90
    Elite,     // 80 – 89
    Solid,     // 70 – 79
    Average,   // 60 – 69
    Rejected,  // < 60
}

impl Tier {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Tier::Legendary
        } else if score >= 80.0 {
            Tier::Elite
        } else if score >= 70.0 {
            Tier::Solid
        } else if score >= 60.0 {
            Tier::Average
        } else {
            Tier::Rejected
        }
    }

    pub fn of(candidate: &CandidateScore) -> Self {
        Self::from_score(candidate.overall_score)
    }
}

/// Descending by `dimension`; ties keep their input order.
pub fn sort_candidates(candidates: &[CandidateScore], dimension: ScoreDimension) -> Vec<CandidateScore> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| dimension.value(b).total_cmp(&dimension.value(a)));
    sorted
}

/// Keeps candidates in `tier`. `None` keeps everything.
pub fn filter_by_tier(candidates: &[CandidateScore], tier: Option<Tier>) -> Vec<CandidateScore> {
    match tier {
        None => candidates.to_vec(),
        Some(tier) => candidates
            .iter()
            .filter(|c| Tier::of(c) == tier)
            .cloned()
            .collect(),
    }
}

/// Sort, then filter.
pub fn rank(
    candidates: &[CandidateScore],
    dimension: ScoreDimension,
    tier: Option<Tier>,
) -> Vec<CandidateScore> {
    filter_by_tier(&sort_candidates(candidates, dimension), tier)
}
