use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::history::commits::build_field_change_commits;
use crate::history::diff::diff_field_maps;
use crate::history::flatten::flatten_resume_fields;
use crate::history::hotspots::build_field_hotspots;
use crate::history::models::{Commit, CommitStats, FieldChange, Hotspot, VersionRecord};
use crate::models::resume::ResumeVersionRow;
use crate::resumes::handlers::UserIdQuery;
use crate::resumes::store::{get_owned_resume, get_owned_version};
use crate::state::AppState;

/// Hotspots shown when the caller does not ask for a specific count.
pub const DEFAULT_HOTSPOT_LIMIT: usize = 8;

#[derive(Deserialize)]
pub struct HotspotQuery {
    pub user_id: Uuid,
    pub limit: Option<usize>,
}

#[derive(Deserialize)]
pub struct DiffQuery {
    pub user_id: Uuid,
    pub version_id_1: Uuid,
    pub version_id_2: Uuid,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub resume_id: Uuid,
    pub total_versions: usize,
    pub commits: Vec<Commit>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotspotResponse {
    pub resume_id: Uuid,
    pub total_commits: usize,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDiffResponse {
    pub version1: ResumeVersionRow,
    pub version2: ResumeVersionRow,
    pub changes: Vec<FieldChange>,
    pub stats: CommitStats,
}

/// Loads a resume's versions after checking the caller owns it.
pub async fn load_owned_versions(
    state: &AppState,
    resume_id: Uuid,
    user_id: Uuid,
) -> Result<Vec<VersionRecord>, AppError> {
    get_owned_resume(&state.db, resume_id, user_id).await?;
    let rows = state.versions.list_versions(resume_id).await?;
    Ok(rows.into_iter().map(VersionRecord::from).collect())
}

/// GET /api/v1/resumes/:id/history
pub async fn handle_history(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let versions = load_owned_versions(&state, id, params.user_id).await?;
    Ok(Json(HistoryResponse {
        resume_id: id,
        total_versions: versions.len(),
        commits: build_field_change_commits(&versions),
    }))
}

/// GET /api/v1/resumes/:id/hotspots
pub async fn handle_hotspots(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<HotspotQuery>,
) -> Result<Json<HotspotResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_HOTSPOT_LIMIT);
    if limit == 0 {
        return Err(AppError::Validation("limit must be positive".to_string()));
    }

    let versions = load_owned_versions(&state, id, params.user_id).await?;
    let commits = build_field_change_commits(&versions);
    let mut hotspots = build_field_hotspots(&commits);
    hotspots.truncate(limit);

    Ok(Json(HotspotResponse {
        resume_id: id,
        total_commits: commits.len(),
        hotspots,
    }))
}

/// GET /api/v1/resumes/diff
/// Field-level diff between any two versions the caller owns.
pub async fn handle_version_diff(
    State(state): State<AppState>,
    Query(params): Query<DiffQuery>,
) -> Result<Json<VersionDiffResponse>, AppError> {
    let version1 = get_owned_version(&state.db, params.version_id_1, params.user_id).await?;
    let version2 = get_owned_version(&state.db, params.version_id_2, params.user_id).await?;

    let changes = diff_field_maps(
        &flatten_resume_fields(&serde_json::Value::String(version1.content.clone())),
        &flatten_resume_fields(&serde_json::Value::String(version2.content.clone())),
    );

    Ok(Json(VersionDiffResponse {
        stats: CommitStats::from_changes(&changes),
        changes,
        version1,
        version2,
    }))
}
