use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::contributions::aggregate::{collect_version_lists, ActivitySummary};
use crate::contributions::calendar::{
    build_contribution_data_from_version_lists, build_contribution_data_from_versions,
    CalendarWindow, ContributionData, MAX_WINDOW_DAYS, MIN_WINDOW_DAYS,
};
use crate::errors::AppError;
use crate::history::handlers::load_owned_versions;
use crate::resumes::store::list_resumes;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ContributionQuery {
    pub user_id: Uuid,
    pub days: Option<u32>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileActivityResponse {
    pub window_days: u32,
    pub contribution: ContributionData,
    #[serde(flatten)]
    pub summary: ActivitySummary,
}

/// Requested window, or the configured default. Out-of-range requests are
/// rejected rather than silently clamped.
pub fn resolve_window_days(requested: Option<u32>, default_days: u32) -> Result<u32, AppError> {
    let days = requested.unwrap_or(default_days);
    if !(MIN_WINDOW_DAYS..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::Validation(format!(
            "days must be between {MIN_WINDOW_DAYS} and {MAX_WINDOW_DAYS}"
        )));
    }
    Ok(days)
}

/// GET /api/v1/resumes/:id/contributions
pub async fn handle_resume_contributions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ContributionQuery>,
) -> Result<Json<ContributionData>, AppError> {
    let days = resolve_window_days(params.days, state.config.contribution_window_days)?;
    let versions = load_owned_versions(&state, id, params.user_id).await?;

    let window = CalendarWindow::ending_today(days);
    Ok(Json(build_contribution_data_from_versions(&versions, &window, &Local)))
}

/// GET /api/v1/profile/activity
pub async fn handle_profile_activity(
    State(state): State<AppState>,
    Query(params): Query<ContributionQuery>,
) -> Result<Json<ProfileActivityResponse>, AppError> {
    let days = resolve_window_days(params.days, state.config.contribution_window_days)?;

    let resume_ids: Vec<Uuid> = list_resumes(&state.db, params.user_id)
        .await?
        .into_iter()
        .filter(|r| r.version_count > 0)
        .map(|r| r.id)
        .collect();

    let collected = collect_version_lists(state.versions.as_ref(), &resume_ids).await;
    let window = CalendarWindow::ending_today(days);

    Ok(Json(ProfileActivityResponse {
        window_days: days,
        contribution: build_contribution_data_from_version_lists(&collected.lists, &window, &Local),
        summary: ActivitySummary::from(&collected),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_defaults_to_config() {
        assert_eq!(resolve_window_days(None, 365).unwrap(), 365);
        assert_eq!(resolve_window_days(Some(140), 365).unwrap(), 140);
    }

    #[test]
    fn test_window_bounds_are_enforced() {
        assert!(resolve_window_days(Some(0), 365).is_err());
        assert!(resolve_window_days(Some(MAX_WINDOW_DAYS + 1), 365).is_err());
        assert!(resolve_window_days(Some(MAX_WINDOW_DAYS), 365).is_ok());
    }
}
