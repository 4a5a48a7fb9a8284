use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::{KeyValueStore, StorageError};
use crate::models::analysis::AnalysisResult;
use crate::models::job::JobDescription;
use crate::models::resume::Resume;

pub const RESUMES_KEY: &str = "resumes";
pub const JOB_DESCRIPTIONS_KEY: &str = "jobDescriptions";
pub const ANALYSIS_RESULTS_KEY: &str = "analysisResults";

/// Reads and writes the three record collections.
///
/// Every write serializes a whole collection. Reads never fail on missing or
/// unreadable payloads: both come back as an empty collection. Backend failures
/// still propagate.
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn resumes(&self) -> Result<Vec<Resume>, StorageError> {
        self.load(RESUMES_KEY).await
    }

    pub async fn save_resumes(&self, resumes: &[Resume]) -> Result<(), StorageError> {
        self.save(RESUMES_KEY, resumes).await
    }

    pub async fn job_descriptions(&self) -> Result<Vec<JobDescription>, StorageError> {
        self.load(JOB_DESCRIPTIONS_KEY).await
    }

    /// Replaces any stored job description with the same id, then appends.
    pub async fn save_job_description(&self, job: &JobDescription) -> Result<(), StorageError> {
        let mut jobs = self.job_descriptions().await?;
        jobs.retain(|existing| existing.id != job.id);
        jobs.push(job.clone());
        self.save(JOB_DESCRIPTIONS_KEY, &jobs).await
    }

    pub async fn analysis_results(&self) -> Result<Vec<AnalysisResult>, StorageError> {
        self.load(ANALYSIS_RESULTS_KEY).await
    }

    /// Keeps at most one result per job id: the one being saved.
    pub async fn save_analysis_result(&self, result: &AnalysisResult) -> Result<(), StorageError> {
        let mut results = self.analysis_results().await?;
        results.retain(|existing| existing.job_id != result.job_id);
        results.push(result.clone());
        self.save(ANALYSIS_RESULTS_KEY, &results).await
    }

    pub async fn clear_all(&self) -> Result<(), StorageError> {
        for key in [RESUMES_KEY, JOB_DESCRIPTIONS_KEY, ANALYSIS_RESULTS_KEY] {
            self.store.remove(key).await?;
        }
        debug!("Cleared all stored collections");
        Ok(())
    }

    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, StorageError> {
        let Some(raw) = self.store.get(key).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_slice(&raw) {
            Ok(items) => Ok(items),
            Err(e) => {
                warn!("Stored collection '{key}' is unreadable, treating as empty: {e}");
                Ok(Vec::new())
            }
        }
    }

    async fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<(), StorageError> {
        let payload = serde_json::to_vec(items)?;
        self.store.set(key, payload).await?;
        debug!("Stored {} record(s) under '{key}'", items.len());
        Ok(())
    }
}
