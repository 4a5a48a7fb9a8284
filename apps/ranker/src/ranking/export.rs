//! CSV export of ranked candidates.

use anyhow::{Context, Result};

use crate::models::analysis::CandidateScore;

const HEADER: [&str; 6] = [
    "Candidate",
    "Overall Score",
    "Technical",
    "Experience",
    "Cultural",
    "Match %",
];

/// One row per candidate, in the order given.
pub fn to_csv(candidates: &[CandidateScore]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for c in candidates {
        writer.write_record([
            c.file_name.clone(),
            c.overall_score.to_string(),
            c.technical_score.to_string(),
            c.experience_score.to_string(),
            c.cultural_score.to_string(),
            c.match_percentage.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV writer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// `<job title>_analysis_results.csv`, with characters unsafe in file names replaced.
pub fn file_name(job_title: &str) -> String {
    let stem: String = job_title
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || matches!(ch, '-' | '_' | '.' | ' ') {
                ch
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "job" } else { stem.as_str() };
    format!("{stem}_analysis_results.csv")
}
