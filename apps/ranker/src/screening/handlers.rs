//! Axum route handlers for the Screening API.

use axum::{
    extract::{rejection::QueryRejection, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::analysis::{average_overall, AnalysisResult, CandidateScore};
use crate::models::job::JobDescription;
use crate::models::resume::Resume;
use crate::ranking::{export, rank, ScoreDimension, Tier};
use crate::screening::ingest::{resume_from_upload, UploadedFile};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub busy: bool,
    pub resume_count: usize,
    pub has_job_description: bool,
    pub result_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct SaveJobDescriptionRequest {
    /// Present when editing an existing job description.
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub content: String,
    #[serde(default)]
    pub requirements: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct EnhanceRequest {
    pub title: String,
    pub company: String,
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct RunAnalysisResponse {
    /// `None` when the model scored no candidates.
    pub result: Option<AnalysisResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    #[serde(default)]
    pub sort_by: ScoreDimension,
    pub tier: Option<Tier>,
}

#[derive(Debug, Serialize)]
pub struct RankedCandidate {
    pub tier: Tier,
    #[serde(flatten)]
    pub candidate: CandidateScore,
}

#[derive(Debug, Serialize)]
pub struct RankedResultsResponse {
    pub job_id: Option<String>,
    pub sort_by: ScoreDimension,
    pub tier: Option<Tier>,
    /// Count and average over all scored candidates, before tier filtering.
    pub total_candidates: usize,
    pub average_score: Option<f64>,
    pub candidates: Vec<RankedCandidate>,
}

fn require_field(name: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} cannot be empty")));
    }
    Ok(())
}

/// Unknown `sort_by` / `tier` values become a JSON validation error instead of
/// axum's plain-text rejection.
fn rank_query(query: Result<Query<RankQuery>, QueryRejection>) -> Result<RankQuery, AppError> {
    query
        .map(|Query(q)| q)
        .map_err(|rejection| AppError::Validation(rejection.body_text()))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/status
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let snapshot = state.session.snapshot().await;
    Json(StatusResponse {
        busy: state.session.is_busy(),
        resume_count: snapshot.resumes.len(),
        has_job_description: snapshot.job_description.is_some(),
        result_count: snapshot.results.len(),
    })
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(State(state): State<AppState>) -> Json<Vec<Resume>> {
    Json(state.session.snapshot().await.resumes)
}

/// PUT /api/v1/resumes
///
/// Replaces the whole resume list, e.g. when restoring an exported set.
pub async fn handle_replace_resumes(
    State(state): State<AppState>,
    Json(resumes): Json<Vec<Resume>>,
) -> Result<Json<Vec<Resume>>, AppError> {
    Ok(Json(state.session.ingest_resumes(resumes).await?))
}

/// POST /api/v1/resumes
///
/// Multipart upload. Every part with a file name becomes a resume appended to
/// the current list. The whole upload is rejected if any file is unreadable.
pub async fn handle_upload_resumes(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Vec<Resume>>), AppError> {
    let mut uploads = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{file_name}': {e}")))?;
        uploads.push(UploadedFile {
            file_name,
            content_type,
            data,
        });
    }

    if uploads.is_empty() {
        return Err(AppError::Validation("No files in upload".to_string()));
    }

    let resumes = tokio::task::spawn_blocking(move || {
        uploads
            .into_iter()
            .map(resume_from_upload)
            .collect::<Result<Vec<_>, _>>()
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Resume extraction task failed: {e}")))??;

    let all = state.session.add_resumes(resumes).await?;
    Ok((StatusCode::CREATED, Json(all)))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.session.remove_resume(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/job-description
pub async fn handle_get_job_description(
    State(state): State<AppState>,
) -> Result<Json<JobDescription>, AppError> {
    state
        .session
        .snapshot()
        .await
        .job_description
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No job description saved".to_string()))
}

/// PUT /api/v1/job-description
///
/// Creates a job description, or replaces the stored one when `id` is given.
pub async fn handle_save_job_description(
    State(state): State<AppState>,
    Json(request): Json<SaveJobDescriptionRequest>,
) -> Result<Json<JobDescription>, AppError> {
    require_field("title", &request.title)?;
    require_field("company", &request.company)?;
    require_field("content", &request.content)?;

    let requirements = request
        .requirements
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();

    let job = JobDescription::new(
        request.id.filter(|id| !id.trim().is_empty()),
        request.title.trim().to_string(),
        request.company.trim().to_string(),
        request.content,
        requirements,
    );
    Ok(Json(state.session.save_job_description(job).await?))
}

/// POST /api/v1/job-description/enhance
pub async fn handle_enhance_job_description(
    State(state): State<AppState>,
    Json(request): Json<EnhanceRequest>,
) -> Result<Json<JobDescription>, AppError> {
    require_field("title", &request.title)?;
    require_field("company", &request.company)?;
    require_field("description", &request.description)?;

    let job = state
        .session
        .enhance_job_description(
            request.title.trim(),
            request.company.trim(),
            &request.description,
        )
        .await?;
    Ok(Json(job))
}

/// POST /api/v1/analysis
pub async fn handle_run_analysis(
    State(state): State<AppState>,
) -> Result<Json<RunAnalysisResponse>, AppError> {
    let result = state.session.run_analysis().await?;
    Ok(Json(RunAnalysisResponse { result }))
}

/// GET /api/v1/analysis?sort_by=technical&tier=elite
pub async fn handle_get_results(
    State(state): State<AppState>,
    query: Result<Query<RankQuery>, QueryRejection>,
) -> Result<Json<RankedResultsResponse>, AppError> {
    let query = rank_query(query)?;
    let snapshot = state.session.snapshot().await;
    let candidates = rank(&snapshot.results, query.sort_by, query.tier)
        .into_iter()
        .map(|candidate| RankedCandidate {
            tier: Tier::of(&candidate),
            candidate,
        })
        .collect();

    Ok(Json(RankedResultsResponse {
        job_id: snapshot.job_description.map(|j| j.id),
        sort_by: query.sort_by,
        tier: query.tier,
        total_candidates: snapshot.results.len(),
        average_score: average_overall(&snapshot.results),
        candidates,
    }))
}

/// GET /api/v1/analysis/export?sort_by=overall&tier=solid
///
/// CSV of the same sorted, filtered view as `handle_get_results`.
pub async fn handle_export_results(
    State(state): State<AppState>,
    query: Result<Query<RankQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let query = rank_query(query)?;
    let snapshot = state.session.snapshot().await;
    let ranked = rank(&snapshot.results, query.sort_by, query.tier);
    let csv = export::to_csv(&ranked)?;

    let title = snapshot
        .job_description
        .as_ref()
        .map(|j| j.title.as_str())
        .unwrap_or_default();
    let disposition = format!("attachment; filename=\"{}\"", export::file_name(title));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}

/// DELETE /api/v1/data
pub async fn handle_clear_all(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.session.clear_all().await?;
    Ok(StatusCode::NO_CONTENT)
}
