//! Commit Builder — turns a resume's version list into diff-bearing commits.

use tracing::debug;

use crate::history::diff::diff_field_maps;
use crate::history::flatten::flatten_resume_fields;
use crate::history::models::{Commit, CommitStats, FieldMap, VersionRecord};

const HASH_LEN: usize = 8;

/// Sorts a copy of `versions` into history order. Stable, so records that
/// compare equal keep their input order.
pub fn sort_versions_ascending(versions: &[VersionRecord]) -> Vec<&VersionRecord> {
    let mut ordered: Vec<&VersionRecord> = versions.iter().collect();
    ordered.sort_by(|a, b| a.history_order(b));
    ordered
}

/// Builds one commit per version, each diffed against its predecessor
/// (the first against an empty map). Returned newest first.
pub fn build_field_change_commits(versions: &[VersionRecord]) -> Vec<Commit> {
    let ordered = sort_versions_ascending(versions);

    // Flatten every snapshot exactly once.
    let field_maps: Vec<FieldMap> = ordered
        .iter()
        .map(|v| flatten_resume_fields(&v.content))
        .collect();

    let empty = FieldMap::new();
    let mut commits: Vec<(&VersionRecord, Commit)> = ordered
        .iter()
        .enumerate()
        .map(|(i, &version)| {
            let previous = if i == 0 { &empty } else { &field_maps[i - 1] };
            let changes = diff_field_maps(previous, &field_maps[i]);
            let commit = Commit {
                id: version.id.clone(),
                version: version.version,
                created_at: version.created_at,
                message: commit_message(version),
                hash: short_hash(version.id.as_deref()),
                stats: CommitStats::from_changes(&changes),
                total_changed_fields: changes.len(),
                changes,
            };
            (version, commit)
        })
        .collect();

    // Stable descending sort: ties stay in processing order.
    commits.sort_by(|(a, _), (b, _)| b.history_order(a));
    debug!("Built {} commits from {} versions", commits.len(), versions.len());
    commits.into_iter().map(|(_, commit)| commit).collect()
}

fn commit_message(version: &VersionRecord) -> String {
    match version.commit_msg.as_deref() {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => match version.version {
            Some(n) => format!("Version {n}"),
            None => "Untitled version".to_string(),
        },
    }
}

fn short_hash(id: Option<&str>) -> String {
    match id {
        Some(id) if !id.is_empty() => id.chars().take(HASH_LEN).collect(),
        _ => "unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::diff::apply_changes;
    use crate::history::models::ChangeType;
    use chrono::{TimeZone, Utc};
    use serde_json::{json, Value};

    fn version(id: &str, n: i64, content: Value) -> VersionRecord {
        VersionRecord {
            id: Some(id.to_string()),
            version: Some(n),
            content,
            commit_msg: None,
            created_at: Some(Utc.with_ymd_and_hms(2024, 1, n as u32, 12, 0, 0).unwrap()),
        }
    }

    fn exp_section(items: Value) -> Value {
        json!({"sections": [{"id": "exp", "type": "list", "content": items}]})
    }

    #[test]
    fn test_first_list_item_shows_up_as_added() {
        let versions = vec![
            version("v1", 1, exp_section(json!([]))),
            version("v2", 2, exp_section(json!([{"id": "e1", "title": "Engineer"}]))),
        ];
        let commits = build_field_change_commits(&versions);

        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].version, Some(2));
        assert_eq!(commits[0].changes.len(), 1);
        let change = &commits[0].changes[0];
        assert_eq!(change.field, "exp[1].title");
        assert_eq!(change.before, "");
        assert_eq!(change.after, "Engineer");
        assert_eq!(change.change_type, ChangeType::Added);
        assert!(commits[1].changes.is_empty());
    }

    #[test]
    fn test_commits_are_newest_first_regardless_of_input_order() {
        let versions = vec![
            version("c", 3, json!({"a": "3"})),
            version("a", 1, json!({"a": "1"})),
            version("b", 2, json!({"a": "2"})),
        ];
        let order: Vec<_> = build_field_change_commits(&versions)
            .iter()
            .map(|c| c.version)
            .collect();
        assert_eq!(order, vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn test_message_and_hash_defaults() {
        let mut with_msg = version("0123456789abcdef", 1, json!({}));
        with_msg.commit_msg = Some("Tighten summary".to_string());
        let mut anonymous = version("", 2, json!({}));
        anonymous.id = None;
        anonymous.commit_msg = Some(String::new());

        let commits = build_field_change_commits(&[with_msg, anonymous]);
        assert_eq!(commits[1].message, "Tighten summary");
        assert_eq!(commits[1].hash, "01234567");
        assert_eq!(commits[0].message, "Version 2");
        assert_eq!(commits[0].hash, "unknown");
    }

    #[test]
    fn test_stats_match_change_types() {
        let versions = vec![
            version("v1", 1, json!({"a": "1", "b": "2"})),
            version("v2", 2, json!({"b": "3", "c": "4", "d": "5"})),
        ];
        let latest = &build_field_change_commits(&versions)[0];
        assert_eq!(latest.stats, CommitStats { added: 2, removed: 1, modified: 1 });
        assert_eq!(latest.total_changed_fields, 4);
    }

    #[test]
    fn test_malformed_version_does_not_abort_build() {
        let versions = vec![
            version("v1", 1, json!({"name": "Alex"})),
            version("v2", 2, Value::String("{not json".into())),
            version("v3", 3, json!({"name": "Alex"})),
        ];
        let commits = build_field_change_commits(&versions);
        assert_eq!(commits.len(), 3);
        assert_eq!(commits[1].stats.removed, 1);
        assert_eq!(commits[0].stats.added, 1);
    }

    #[test]
    fn test_unnumbered_versions_fall_back_to_created_at() {
        let mut late = version("late", 1, json!({"x": "late"}));
        late.version = None;
        late.created_at = Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let mut early = version("early", 1, json!({"x": "early"}));
        early.version = None;
        early.created_at = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());

        let commits = build_field_change_commits(&[late, early]);
        assert_eq!(commits[0].id.as_deref(), Some("late"));
        assert_eq!(commits[0].changes[0].change_type, ChangeType::Modified);
        assert_eq!(commits[0].message, "Untitled version");
    }

    #[test]
    fn test_equal_versions_keep_input_order() {
        let mut first = version("first", 1, json!({"x": "1"}));
        let mut second = version("second", 1, json!({"x": "2"}));
        first.created_at = None;
        second.created_at = None;

        let commits = build_field_change_commits(&[first, second]);
        // diffed first → second; ties are not flipped for display
        assert_eq!(commits[0].id.as_deref(), Some("first"));
        assert_eq!(commits[1].id.as_deref(), Some("second"));
        assert_eq!(commits[1].changes[0].before, "1");
    }

    #[test]
    fn test_commit_chain_replays_to_final_state() {
        let versions = vec![
            version("v1", 1, json!({"sections": [{"id": "s", "type": "text", "content": "a"}]})),
            version("v2", 2, json!({"sections": [{"id": "s", "type": "text", "content": "b"}, {"id": "p", "type": "personal", "content": {"name": "N"}}]})),
            version("v3", 3, json!({"sections": [{"id": "p", "type": "personal", "content": {"name": "M", "email": "m@x.io"}}]})),
        ];
        let commits = build_field_change_commits(&versions);

        let mut state = FieldMap::new();
        for commit in commits.iter().rev() {
            apply_changes(&mut state, &commit.changes);
        }
        assert_eq!(state, flatten_resume_fields(&versions[2].content));
    }
}
