use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_public: bool,
    /// Working copy of the editor tree, JSON-encoded.
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Resume listing row with its version count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeSummaryRow {
    pub id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_public: bool,
    pub updated_at: DateTime<Utc>,
    pub version_count: i64,
}

/// Append-only snapshot of a resume's content.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeVersionRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub version: i32,
    pub content: String,
    pub commit_msg: Option<String>,
    pub created_at: DateTime<Utc>,
}
