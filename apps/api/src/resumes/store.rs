//! Resume and version persistence.
//!
//! Versions are append-only: a new snapshot is always an INSERT with the
//! next version number, never an UPDATE of an existing row.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{ResumeRow, ResumeSummaryRow, ResumeVersionRow};

/// Source of a resume's version list. `AppState` carries an
/// `Arc<dyn VersionStore>` so history views can be built without knowing
/// where versions live.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// All versions of one resume, newest first.
    async fn list_versions(&self, resume_id: Uuid) -> Result<Vec<ResumeVersionRow>, AppError>;
}

/// Postgres-backed [`VersionStore`].
#[derive(Clone)]
pub struct PgVersionStore {
    pool: PgPool,
}

impl PgVersionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn list_versions(&self, resume_id: Uuid) -> Result<Vec<ResumeVersionRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeVersionRow>(
            r#"
            SELECT * FROM resume_versions
            WHERE resume_id = $1
            ORDER BY version DESC, created_at DESC
            "#,
        )
        .bind(resume_id)
        .fetch_all(&self.pool)
        .await?)
    }
}

/// Fields accepted when creating or updating a resume.
pub struct ResumeFields<'a> {
    pub title: Option<&'a str>,
    pub category: Option<&'a str>,
    pub description: Option<&'a str>,
    pub is_public: Option<bool>,
    pub content: Option<&'a str>,
}

pub async fn create_resume(
    pool: &PgPool,
    owner_id: Uuid,
    title: &str,
    fields: ResumeFields<'_>,
) -> Result<ResumeRow, AppError> {
    let resume = sqlx::query_as::<_, ResumeRow>(
        r#"
        INSERT INTO resumes (id, owner_id, title, category, description, is_public, content)
        VALUES ($1, $2, $3, $4, $5, COALESCE($6, FALSE), $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(title)
    .bind(fields.category)
    .bind(fields.description)
    .bind(fields.is_public)
    .bind(fields.content)
    .fetch_one(pool)
    .await?;

    info!("Created resume {} for owner {owner_id}", resume.id);
    Ok(resume)
}

/// Non-deleted resumes of an owner, most recently updated first.
pub async fn list_resumes(pool: &PgPool, owner_id: Uuid) -> Result<Vec<ResumeSummaryRow>, AppError> {
    Ok(sqlx::query_as::<_, ResumeSummaryRow>(
        r#"
        SELECT r.id, r.title, r.category, r.description, r.is_public, r.updated_at,
               COUNT(v.id) AS version_count
        FROM resumes r
        LEFT JOIN resume_versions v ON v.resume_id = r.id
        WHERE r.owner_id = $1 AND r.deleted_at IS NULL
        GROUP BY r.id
        ORDER BY r.updated_at DESC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?)
}

/// Fetches a resume only if it belongs to `owner_id` and is not deleted.
pub async fn get_owned_resume(
    pool: &PgPool,
    resume_id: Uuid,
    owner_id: Uuid,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        "SELECT * FROM resumes WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
    )
    .bind(resume_id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// Partial update; absent fields keep their stored value.
pub async fn update_resume(
    pool: &PgPool,
    resume_id: Uuid,
    owner_id: Uuid,
    fields: ResumeFields<'_>,
) -> Result<ResumeRow, AppError> {
    sqlx::query_as::<_, ResumeRow>(
        r#"
        UPDATE resumes SET
            title       = COALESCE($3, title),
            category    = COALESCE($4, category),
            description = COALESCE($5, description),
            is_public   = COALESCE($6, is_public),
            content     = COALESCE($7, content),
            updated_at  = NOW()
        WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(resume_id)
    .bind(owner_id)
    .bind(fields.title)
    .bind(fields.category)
    .bind(fields.description)
    .bind(fields.is_public)
    .bind(fields.content)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
}

/// Soft delete. Versions are kept.
pub async fn delete_resume(pool: &PgPool, resume_id: Uuid, owner_id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query(
        "UPDATE resumes SET deleted_at = NOW() WHERE id = $1 AND owner_id = $2 AND deleted_at IS NULL",
    )
    .bind(resume_id)
    .bind(owner_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
    }
    info!("Soft-deleted resume {resume_id}");
    Ok(())
}

/// Appends a new version with number `MAX(version) + 1`.
pub async fn append_version(
    pool: &PgPool,
    resume_id: Uuid,
    content: &str,
    commit_msg: Option<&str>,
) -> Result<ResumeVersionRow, AppError> {
    let mut tx = pool.begin().await?;

    // Serialize concurrent appends for the same resume.
    sqlx::query("SELECT id FROM resumes WHERE id = $1 FOR UPDATE")
        .bind(resume_id)
        .execute(&mut *tx)
        .await?;

    let current_max: Option<i32> =
        sqlx::query_scalar("SELECT MAX(version) FROM resume_versions WHERE resume_id = $1")
            .bind(resume_id)
            .fetch_one(&mut *tx)
            .await?;
    let next_version = current_max.unwrap_or(0) + 1;

    let row = sqlx::query_as::<_, ResumeVersionRow>(
        r#"
        INSERT INTO resume_versions (id, resume_id, version, content, commit_msg)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(resume_id)
    .bind(next_version)
    .bind(content)
    .bind(commit_msg)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    info!("Appended version {next_version} to resume {resume_id}");
    Ok(row)
}

const OWNED_VERSION_SQL: &str = r#"
    SELECT v.* FROM resume_versions v
    JOIN resumes r ON r.id = v.resume_id
    WHERE v.id = $1 AND r.owner_id = $2 AND r.deleted_at IS NULL
"#;

/// Fetches one version, scoped to live resumes owned by `owner_id`.
pub async fn get_owned_version(
    pool: &PgPool,
    version_id: Uuid,
    owner_id: Uuid,
) -> Result<ResumeVersionRow, AppError> {
    sqlx::query_as::<_, ResumeVersionRow>(OWNED_VERSION_SQL)
        .bind(version_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Version {version_id} not found")))
}
