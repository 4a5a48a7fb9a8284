use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The AI-produced evaluation of one resume against one job description.
/// Scores are conventionally 0 – 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateScore {
    pub resume_id: String,
    pub file_name: String,
    pub overall_score: f64,
    pub technical_score: f64,
    pub experience_score: f64,
    pub cultural_score: f64,
    pub match_percentage: f64,
    pub reasoning: String,
    pub key_strengths: Vec<String>,
    pub key_weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// All candidate scores for one job description plus summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub job_id: String,
    pub candidates: Vec<CandidateScore>,
    pub analysis_date: DateTime<Utc>,
    pub total_candidates: usize,
    /// Mean of all `overall_score` values. `None` when there are no candidates.
    pub average_score: Option<f64>,
}

impl AnalysisResult {
    pub fn new(job_id: String, candidates: Vec<CandidateScore>) -> Self {
        let total_candidates = candidates.len();
        let average_score = average_overall(&candidates);
        Self {
            job_id,
            candidates,
            analysis_date: Utc::now(),
            total_candidates,
            average_score,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Mean of all `overall_score` values, `None` for an empty list.
pub fn average_overall(candidates: &[CandidateScore]) -> Option<f64> {
    if candidates.is_empty() {
        return None;
    }
    let total: f64 = candidates.iter().map(|c| c.overall_score).sum();
    Some(total / candidates.len() as f64)
}
