pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::ai::handlers as ai;
use crate::contributions::handlers as contributions;
use crate::history::handlers as history;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Resumes and versions
        .route(
            "/api/v1/resumes",
            post(resumes::handle_create_resume).get(resumes::handle_list_resumes),
        )
        .route("/api/v1/resumes/versions", post(resumes::handle_create_version))
        .route("/api/v1/resumes/diff", get(history::handle_version_diff))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route("/api/v1/resumes/:id/versions", get(resumes::handle_list_versions))
        // History views
        .route("/api/v1/resumes/:id/history", get(history::handle_history))
        .route("/api/v1/resumes/:id/hotspots", get(history::handle_hotspots))
        .route(
            "/api/v1/resumes/:id/contributions",
            get(contributions::handle_resume_contributions),
        )
        .route(
            "/api/v1/profile/activity",
            get(contributions::handle_profile_activity),
        )
        // AI suggestions
        .route("/api/v1/ai/improve", post(ai::handle_improve))
        .route("/api/v1/ai/suggest-skills", post(ai::handle_suggest_skills))
        .route("/api/v1/ai/summary", post(ai::handle_summary))
        .route("/api/v1/ai/recommend-resume", post(ai::handle_recommend_resume))
        .route(
            "/api/v1/ai/recommendation-categories",
            get(ai::handle_recommendation_categories),
        )
        .with_state(state)
}
