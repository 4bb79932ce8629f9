use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::resume::ResumeVersionRow;

/// Flattened view of one snapshot: field path → normalized text.
/// `BTreeMap` keeps key order byte-lexicographic, which the diff relies on.
pub type FieldMap = BTreeMap<String, String>;

/// One persisted resume snapshot as the history core sees it.
///
/// `content` is either a JSON-encoded string or an already-parsed tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<i64>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub commit_msg: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl VersionRecord {
    /// Total history order: numbered records first, ascending `version`,
    /// then ascending `created_at` (absent sorts as the epoch).
    pub fn history_order(&self, other: &Self) -> Ordering {
        let by_number = match (self.version, other.version) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_number.then_with(|| self.created_at.cmp(&other.created_at))
    }
}

impl From<ResumeVersionRow> for VersionRecord {
    fn from(row: ResumeVersionRow) -> Self {
        Self {
            id: Some(row.id.to_string()),
            version: Some(i64::from(row.version)),
            content: Value::String(row.content),
            commit_msg: row.commit_msg,
            created_at: Some(row.created_at),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    pub field: String,
    pub before: String,
    pub after: String,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl CommitStats {
    pub fn from_changes(changes: &[FieldChange]) -> Self {
        changes.iter().fold(Self::default(), |mut stats, change| {
            match change.change_type {
                ChangeType::Added => stats.added += 1,
                ChangeType::Removed => stats.removed += 1,
                ChangeType::Modified => stats.modified += 1,
            }
            stats
        })
    }
}

/// A version viewed as a diff against its predecessor. Derived, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commit {
    pub id: Option<String>,
    pub version: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub message: String,
    pub hash: String,
    pub changes: Vec<FieldChange>,
    pub stats: CommitStats,
    pub total_changed_fields: usize,
}

/// Per-field change tally across a commit list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotspot {
    pub field: String,
    pub count: usize,
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
}

impl Hotspot {
    pub fn new(field: &str) -> Self {
        Self {
            field: field.to_string(),
            count: 0,
            added: 0,
            removed: 0,
            modified: 0,
        }
    }

    pub fn record(&mut self, change_type: ChangeType) {
        self.count += 1;
        match change_type {
            ChangeType::Added => self.added += 1,
            ChangeType::Removed => self.removed += 1,
            ChangeType::Modified => self.modified += 1,
        }
    }
}
