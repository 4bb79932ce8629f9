use std::collections::BTreeMap;

use crate::history::models::{Commit, Hotspot};

/// Tallies how often each field changed across `commits`.
/// Sorted by `count` descending, then field name ascending.
pub fn build_field_hotspots(commits: &[Commit]) -> Vec<Hotspot> {
    let mut by_field: BTreeMap<&str, Hotspot> = BTreeMap::new();

    for change in commits.iter().flat_map(|c| c.changes.iter()) {
        if change.field.is_empty() {
            continue;
        }
        by_field
            .entry(change.field.as_str())
            .or_insert_with(|| Hotspot::new(&change.field))
            .record(change.change_type);
    }

    let mut hotspots: Vec<Hotspot> = by_field.into_values().collect();
    hotspots.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.field.cmp(&b.field)));
    hotspots
}
