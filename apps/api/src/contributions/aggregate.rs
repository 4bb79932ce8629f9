//! Cross-resume activity: fetch every resume's versions concurrently and
//! keep whatever succeeded. One failed fetch contributes no events; it
//! never fails the whole aggregate.

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

use crate::history::models::VersionRecord;
use crate::resumes::store::VersionStore;

/// Version lists that were fetched, plus the resumes that could not be.
#[derive(Debug, Default)]
pub struct CollectedVersions {
    pub lists: Vec<Vec<VersionRecord>>,
    pub failed: Vec<Uuid>,
}

impl CollectedVersions {
    pub fn total_versions(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }

    pub fn latest_commit_at(&self) -> Option<DateTime<Utc>> {
        self.lists
            .iter()
            .flatten()
            .filter_map(|v| v.created_at)
            .max()
    }
}

/// Fetches all `resume_ids` in parallel and waits for every fetch to settle.
pub async fn collect_version_lists(store: &dyn VersionStore, resume_ids: &[Uuid]) -> CollectedVersions {
    let fetches = resume_ids.iter().map(|&id| async move {
        (id, store.list_versions(id).await)
    });

    let mut collected = CollectedVersions::default();
    for (resume_id, result) in join_all(fetches).await {
        match result {
            Ok(rows) => collected
                .lists
                .push(rows.into_iter().map(VersionRecord::from).collect()),
            Err(e) => {
                warn!("Skipping resume {resume_id} in activity aggregate: {e}");
                collected.failed.push(resume_id);
            }
        }
    }
    collected
}

/// Summary attached to a profile activity calendar.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_versions: usize,
    pub latest_commit_at: Option<DateTime<Utc>>,
    pub failed_resume_ids: Vec<Uuid>,
}

impl From<&CollectedVersions> for ActivitySummary {
    fn from(collected: &CollectedVersions) -> Self {
        Self {
            total_versions: collected.total_versions(),
            latest_commit_at: collected.latest_commit_at(),
            failed_resume_ids: collected.failed.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::models::resume::ResumeVersionRow;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::collections::HashMap;

    /// In-memory store; ids missing from the map fail like a dropped connection.
    struct FakeStore {
        rows: HashMap<Uuid, Vec<ResumeVersionRow>>,
    }

    #[async_trait]
    impl VersionStore for FakeStore {
        async fn list_versions(&self, resume_id: Uuid) -> Result<Vec<ResumeVersionRow>, AppError> {
            self.rows
                .get(&resume_id)
                .cloned()
                .ok_or_else(|| AppError::Internal(anyhow::anyhow!("connection reset")))
        }
    }

    fn row(resume_id: Uuid, version: i32, day: u32) -> ResumeVersionRow {
        ResumeVersionRow {
            id: Uuid::new_v4(),
            resume_id,
            version,
            content: "{}".to_string(),
            commit_msg: None,
            created_at: Utc.with_ymd_and_hms(2024, 2, day, 9, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_failed_fetch_is_isolated() {
        let ok_a = Uuid::new_v4();
        let ok_b = Uuid::new_v4();
        let broken = Uuid::new_v4();
        let store = FakeStore {
            rows: HashMap::from([
                (ok_a, vec![row(ok_a, 1, 1), row(ok_a, 2, 3)]),
                (ok_b, vec![row(ok_b, 1, 2)]),
            ]),
        };

        let collected = collect_version_lists(&store, &[ok_a, broken, ok_b]).await;

        assert_eq!(collected.lists.len(), 2);
        assert_eq!(collected.failed, vec![broken]);
        assert_eq!(collected.total_versions(), 3);
        assert_eq!(
            collected.latest_commit_at(),
            Some(Utc.with_ymd_and_hms(2024, 2, 3, 9, 0, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_all_failures_yield_empty_lists() {
        let store = FakeStore { rows: HashMap::new() };
        let ids = [Uuid::new_v4(), Uuid::new_v4()];
        let collected = collect_version_lists(&store, &ids).await;

        assert!(collected.lists.is_empty());
        assert_eq!(collected.failed.len(), 2);
        let summary = ActivitySummary::from(&collected);
        assert_eq!(summary.total_versions, 0);
        assert!(summary.latest_commit_at.is_none());
    }
}
