use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single uploaded candidate document, reduced to plain text plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resume {
    pub id: String,
    pub file_name: String,
    pub content: String,
    pub upload_date: DateTime<Utc>,
    pub size: u64,
    #[serde(rename = "type")]
    pub media_type: String,
}
