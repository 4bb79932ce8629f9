use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow, ResumeVersionRow};
use crate::resumes::store::{
    append_version, create_resume, delete_resume, get_owned_resume, list_resumes, update_resume,
    ResumeFields,
};
use crate::state::AppState;

const MAX_CATEGORY_LEN: usize = 64;

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CreateResumeRequest {
    pub user_id: Uuid,
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateResumeRequest {
    pub user_id: Uuid,
    pub title: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    /// Editor tree, JSON-encoded.
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateVersionRequest {
    pub user_id: Uuid,
    pub resume_id: Uuid,
    /// Snapshot as a JSON string or an inline tree.
    pub content: Value,
    pub commit_msg: Option<String>,
}

#[derive(Serialize)]
pub struct VersionListResponse {
    pub resume_id: Uuid,
    pub versions: Vec<ResumeVersionRow>,
}

fn validate_category(category: Option<&str>) -> Result<(), AppError> {
    match category {
        Some(c) if c.chars().count() > MAX_CATEGORY_LEN => Err(AppError::Validation(format!(
            "category must be at most {MAX_CATEGORY_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// Stored form of version content: strings are kept verbatim, trees are
/// JSON-encoded.
pub fn encode_version_content(content: &Value) -> Result<String, AppError> {
    match content {
        Value::Null => Err(AppError::Validation("content is required".to_string())),
        Value::String(raw) => Ok(raw.clone()),
        tree => serde_json::to_string(tree)
            .map_err(|e| AppError::Validation(format!("content is not serializable: {e}"))),
    }
}

/// POST /api/v1/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("title is required".to_string()));
    }
    validate_category(req.category.as_deref())?;

    let resume = create_resume(
        &state.db,
        req.user_id,
        req.title.trim(),
        ResumeFields {
            title: None,
            category: req.category.as_deref(),
            description: req.description.as_deref(),
            is_public: req.is_public,
            content: None,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/v1/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<ResumeSummaryRow>>, AppError> {
    Ok(Json(list_resumes(&state.db, params.user_id).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(get_owned_resume(&state.db, id, params.user_id).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    validate_category(req.category.as_deref())?;

    let resume = update_resume(
        &state.db,
        id,
        req.user_id,
        ResumeFields {
            title: req.title.as_deref(),
            category: req.category.as_deref(),
            description: req.description.as_deref(),
            is_public: req.is_public,
            content: req.content.as_deref(),
        },
    )
    .await?;
    Ok(Json(resume))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<StatusCode, AppError> {
    delete_resume(&state.db, id, params.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/resumes/:id/versions
pub async fn handle_list_versions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<VersionListResponse>, AppError> {
    get_owned_resume(&state.db, id, params.user_id).await?;
    let versions = state.versions.list_versions(id).await?;
    Ok(Json(VersionListResponse {
        resume_id: id,
        versions,
    }))
}

/// POST /api/v1/resumes/versions
pub async fn handle_create_version(
    State(state): State<AppState>,
    Json(req): Json<CreateVersionRequest>,
) -> Result<(StatusCode, Json<ResumeVersionRow>), AppError> {
    let content = encode_version_content(&req.content)?;
    get_owned_resume(&state.db, req.resume_id, req.user_id).await?;

    let commit_msg = req.commit_msg.as_deref().map(str::trim).filter(|m| !m.is_empty());
    let version = append_version(&state.db, req.resume_id, &content, commit_msg).await?;
    Ok((StatusCode::CREATED, Json(version)))
}
