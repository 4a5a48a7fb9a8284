//! Scoring — the one integration boundary with the external model.
//!
//! Flow: build prompt → single `TextGenerator` call → extract JSON → validate → records.
//! One request, one parse attempt, one outcome. No retry.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::analysis::CandidateScore;
use crate::models::job::JobDescription;
use crate::models::resume::Resume;

pub mod prompts;
pub mod response;

use prompts::{fill, ENHANCE_PROMPT_TEMPLATE, RESUME_BLOCK_TEMPLATE, SCORE_PROMPT_TEMPLATE};
use response::{parse_candidates, parse_enhancement, ResponseError};

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("malformed AI response: {0}")]
    MalformedResponse(#[from] ResponseError),
}

#[derive(Clone)]
pub struct Scorer {
    llm: Arc<dyn TextGenerator>,
}

impl Scorer {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Scores every resume against `job` in a single model call.
    pub async fn score(
        &self,
        job: &JobDescription,
        resumes: &[Resume],
    ) -> Result<Vec<CandidateScore>, ScoringError> {
        let prompt = build_score_prompt(job, resumes);
        info!(
            "Scoring {} resume(s) for '{}' with {}",
            resumes.len(),
            job.title,
            self.llm.model()
        );

        let reply = self.llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
        debug!("Scoring reply: {} chars", reply.len());

        let known: HashSet<&str> = resumes.iter().map(|r| r.id.as_str()).collect();
        Ok(parse_candidates(&reply, &known)?)
    }

    /// Expands a basic description into a full posting with a fresh id.
    pub async fn enhance(
        &self,
        title: &str,
        company: &str,
        basic_description: &str,
    ) -> Result<JobDescription, ScoringError> {
        let prompt = fill(
            ENHANCE_PROMPT_TEMPLATE,
            &[
                ("title", title),
                ("company", company),
                ("description", basic_description),
            ],
        );

        let reply = self.llm.generate(&prompt, JSON_ONLY_SYSTEM).await?;
        let enhancement = parse_enhancement(&reply)?;
        debug!(
            "Enhanced '{title}': {} requirement(s), {} benefit(s), culture: {}",
            enhancement.requirements.len(),
            enhancement.benefits.len(),
            enhancement.culture
        );

        Ok(JobDescription::new(
            None,
            title.to_string(),
            company.to_string(),
            enhancement.enhanced_content,
            enhancement.requirements,
        ))
    }
}

/// Job fields first, then each resume in input order.
fn build_score_prompt(job: &JobDescription, resumes: &[Resume]) -> String {
    let resume_blocks: String = resumes
        .iter()
        .enumerate()
        .map(|(i, resume)| {
            fill(
                RESUME_BLOCK_TEMPLATE,
                &[
                    ("index", (i + 1).to_string().as_str()),
                    ("id", resume.id.as_str()),
                    ("file_name", resume.file_name.as_str()),
                    ("content", resume.content.as_str()),
                ],
            )
        })
        .collect();

    fill(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("title", job.title.as_str()),
            ("company", job.company.as_str()),
            ("requirements", job.requirements.join(", ").as_str()),
            ("content", job.content.as_str()),
            ("resumes", resume_blocks.as_str()),
        ],
    )
}
