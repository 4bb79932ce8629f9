use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::resumes::store::VersionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Version source for history and activity views. Default: `PgVersionStore`.
    pub versions: Arc<dyn VersionStore>,
    /// `None` when no API key is configured.
    pub llm: Option<LlmClient>,
    pub config: Config,
}
