use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescription {
    pub id: String,
    pub title: String,
    pub company: String,
    pub content: String,
    #[serde(default)]
    pub requirements: Vec<String>,
    pub created_date: DateTime<Utc>,
}

impl JobDescription {
    /// Builds a job description stamped now. A missing `id` gets a fresh one.
    pub fn new(
        id: Option<String>,
        title: String,
        company: String,
        content: String,
        requirements: Vec<String>,
    ) -> Self {
        Self {
            id: id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            title,
            company,
            content,
            requirements,
            created_date: Utc::now(),
        }
    }
}
