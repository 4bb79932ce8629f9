use axum::{
    extract::{Query, State},
    Json,
};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::ai::categories::{category_names, DEFAULT_CATEGORY};
use crate::ai::recommend::{build_candidates, recommend_best_version, Recommendation};
use crate::ai::{generate_summary, improve_section, suggest_skills};
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resumes::handlers::UserIdQuery;
use crate::resumes::store::list_resumes;
use crate::state::AppState;

/// Shortest company name worth matching on.
pub const MIN_COMPANY_CHARS: usize = 2;

#[derive(Debug, Deserialize)]
pub struct ImproveRequest {
    pub text: String,
    #[serde(rename = "type")]
    pub section_type: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImproveResponse {
    pub improved_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestSkillsRequest {
    pub job_description: String,
}

#[derive(Serialize)]
pub struct SuggestSkillsResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    /// Resume snapshot, JSON string or tree.
    pub content: Value,
}

#[derive(Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub target_company: String,
    pub target_category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoriesResponse {
    pub categories: Vec<&'static str>,
    pub default_category: &'static str,
}

fn require_llm(state: &AppState) -> Result<&LlmClient, AppError> {
    state
        .llm
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("AI suggestions are not configured".to_string()))
}

/// POST /api/v1/ai/improve
pub async fn handle_improve(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    if req.text.trim().is_empty() || req.section_type.trim().is_empty() {
        return Err(AppError::Validation("text and type are required".to_string()));
    }
    let llm = require_llm(&state)?;
    let improved_text = improve_section(llm, &req.text, &req.section_type).await?;
    Ok(Json(ImproveResponse { improved_text }))
}

/// POST /api/v1/ai/suggest-skills
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    Json(req): Json<SuggestSkillsRequest>,
) -> Result<Json<SuggestSkillsResponse>, AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("jobDescription is required".to_string()));
    }
    let llm = require_llm(&state)?;
    let suggestions = suggest_skills(llm, &req.job_description).await?;
    Ok(Json(SuggestSkillsResponse { suggestions }))
}

/// POST /api/v1/ai/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(req): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let llm = require_llm(&state)?;
    let summary = generate_summary(llm, &req.content).await?;
    Ok(Json(SummaryResponse { summary }))
}

fn validate_company(raw: &str) -> Result<&str, AppError> {
    let company = raw.trim();
    if company.chars().count() < MIN_COMPANY_CHARS {
        return Err(AppError::Validation(format!(
            "targetCompany must be at least {MIN_COMPANY_CHARS} characters"
        )));
    }
    Ok(company)
}

/// POST /api/v1/ai/recommend-resume
/// Works without an LLM: the heuristic answers on its own.
pub async fn handle_recommend_resume(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<Recommendation>, AppError> {
    let company = validate_company(&req.target_company)?;

    let resumes: Vec<_> = list_resumes(&state.db, params.user_id)
        .await?
        .into_iter()
        .filter(|r| r.version_count > 0)
        .collect();

    let store = state.versions.as_ref();
    let fetches = resumes
        .iter()
        .map(|resume| async move { (resume, store.list_versions(resume.id).await) });

    let mut candidates = Vec::new();
    for (resume, result) in join_all(fetches).await {
        match result {
            Ok(versions) => candidates.extend(build_candidates(resume, &versions)),
            Err(e) => warn!("Skipping resume {} in recommendation: {e}", resume.id),
        }
    }

    let recommendation = recommend_best_version(
        state.llm.as_ref(),
        &candidates,
        company,
        req.target_category.as_deref(),
    )
    .await?;
    Ok(Json(recommendation))
}

/// GET /api/v1/ai/recommendation-categories
pub async fn handle_recommendation_categories() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: category_names(),
        default_category: DEFAULT_CATEGORY,
    })
}
