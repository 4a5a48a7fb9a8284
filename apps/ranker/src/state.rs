use std::sync::Arc;

use crate::screening::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single recruiter session: resumes, active job description, results.
    pub session: Arc<Session>,
}
