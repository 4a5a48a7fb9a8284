//! Session — the in-memory client state holder.
//!
//! Holds the current resumes, the active job description and the latest
//! candidate scores, and mediates between API actions, the repository and the
//! scorer. Mutations persist first, then update memory, under the write lock.
//! The model call runs without any lock held; re-entry is gated by the busy flag.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::analysis::{AnalysisResult, CandidateScore};
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::scoring::Scorer;
use crate::storage::{Repository, StorageError};

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub resumes: Vec<Resume>,
    pub job_description: Option<JobDescription>,
    pub results: Vec<CandidateScore>,
}

pub struct Session {
    repository: Repository,
    scorer: Scorer,
    state: RwLock<SessionState>,
    busy: AtomicBool,
}

/// Holds the busy flag for the lifetime of one analysis. Released on drop.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Session {
    /// Loads persisted state. The active job description is the most recently
    /// saved one; results are the stored analysis for that job, if any.
    pub async fn restore(repository: Repository, scorer: Scorer) -> Result<Self, StorageError> {
        let resumes = repository.resumes().await?;
        let job_description = repository.job_descriptions().await?.pop();
        let results = match &job_description {
            Some(job) => repository
                .analysis_results()
                .await?
                .into_iter()
                .find(|r| r.job_id == job.id)
                .map(|r| r.candidates)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        info!(
            "Session restored: {} resume(s), job description: {}, {} scored candidate(s)",
            resumes.len(),
            job_description.as_ref().map_or("none", |j| j.title.as_str()),
            results.len()
        );

        Ok(Self {
            repository,
            scorer,
            state: RwLock::new(SessionState {
                resumes,
                job_description,
                results,
            }),
            busy: AtomicBool::new(false),
        })
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Replaces the resume list and persists it.
    pub async fn ingest_resumes(&self, resumes: Vec<Resume>) -> Result<Vec<Resume>, AppError> {
        let mut state = self.state.write().await;
        self.replace_resumes(&mut state, resumes).await?;
        Ok(state.resumes.clone())
    }

    /// Appends newly uploaded resumes to the current list.
    pub async fn add_resumes(&self, new_resumes: Vec<Resume>) -> Result<Vec<Resume>, AppError> {
        let mut state = self.state.write().await;
        let mut resumes = state.resumes.clone();
        resumes.extend(new_resumes);
        self.replace_resumes(&mut state, resumes).await?;
        Ok(state.resumes.clone())
    }

    pub async fn remove_resume(&self, id: &str) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        if !state.resumes.iter().any(|r| r.id == id) {
            return Err(AppError::NotFound(format!("Resume {id} not found")));
        }
        let remaining: Vec<Resume> = state.resumes.iter().filter(|r| r.id != id).cloned().collect();
        self.replace_resumes(&mut state, remaining).await
    }

    async fn replace_resumes(
        &self,
        state: &mut SessionState,
        resumes: Vec<Resume>,
    ) -> Result<(), AppError> {
        if let Some(blank) = resumes.iter().find(|r| r.id.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "Resume '{}' has an empty id",
                blank.file_name
            )));
        }
        if let Some(blank) = resumes.iter().find(|r| r.content.trim().is_empty()) {
            return Err(AppError::Validation(format!(
                "Resume '{}' has no readable text",
                blank.file_name
            )));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = resumes.iter().find(|r| !seen.insert(r.id.clone())) {
            return Err(AppError::Validation(format!(
                "Duplicate resume id '{}'",
                dup.id
            )));
        }

        self.repository.save_resumes(&resumes).await?;
        info!("Resume list now holds {} resume(s)", resumes.len());
        state.resumes = resumes;
        Ok(())
    }

    /// Persists `job` (replacing any record with its id) and makes it active.
    /// Switching to a different job drops the in-memory results of the old one.
    pub async fn save_job_description(
        &self,
        job: JobDescription,
    ) -> Result<JobDescription, AppError> {
        let mut state = self.state.write().await;
        self.repository.save_job_description(&job).await?;

        let switched = state.job_description.as_ref().map(|j| &j.id) != Some(&job.id);
        if switched {
            state.results.clear();
        }
        info!("Active job description: '{}' at {}", job.title, job.company);
        state.job_description = Some(job.clone());
        Ok(job)
    }

    /// Enhances a basic description through the model and saves the result as active.
    pub async fn enhance_job_description(
        &self,
        title: &str,
        company: &str,
        basic_description: &str,
    ) -> Result<JobDescription, AppError> {
        let job = self
            .scorer
            .enhance(title, company, basic_description)
            .await?;
        self.save_job_description(job).await
    }

    /// Scores every resume against the active job description.
    ///
    /// Returns `None` when the model scored no candidates or the active job
    /// changed while the call was in flight; nothing is stored in either case.
    pub async fn run_analysis(&self) -> Result<Option<AnalysisResult>, AppError> {
        let (job, resumes) = {
            let state = self.state.read().await;
            let job = state.job_description.clone().ok_or_else(|| {
                AppError::Precondition(
                    "Create a job description before running analysis".to_string(),
                )
            })?;
            if state.resumes.is_empty() {
                return Err(AppError::Precondition(
                    "Upload at least one resume before running analysis".to_string(),
                ));
            }
            (job, state.resumes.clone())
        };

        let _busy = BusyGuard::acquire(&self.busy).ok_or(AppError::Busy)?;

        let candidates = self.scorer.score(&job, &resumes).await.map_err(|e| {
            warn!("Analysis for job {} failed: {e}", job.id);
            e
        })?;

        let result = AnalysisResult::new(job.id.clone(), candidates);
        if result.is_empty() {
            warn!("Model scored no candidates for job {}; nothing stored", job.id);
            return Ok(None);
        }

        let mut state = self.state.write().await;
        if state.job_description.as_ref().map(|j| &j.id) != Some(&job.id) {
            warn!("Job {} is no longer active; discarding its analysis", job.id);
            return Ok(None);
        }

        self.repository.save_analysis_result(&result).await?;
        state.results = result.candidates.clone();
        info!(
            "Analysis complete for job {}: {} candidate(s), average {:.1}",
            job.id,
            result.total_candidates,
            result.average_score.unwrap_or_default()
        );
        Ok(Some(result))
    }

    /// Wipes persisted storage and in-memory state.
    pub async fn clear_all(&self) -> Result<(), AppError> {
        let mut state = self.state.write().await;
        self.repository.clear_all().await?;
        *state = SessionState::default();
        info!("All data cleared");
        Ok(())
    }
}
