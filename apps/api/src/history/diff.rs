use std::collections::BTreeSet;

use crate::history::models::{ChangeType, FieldChange, FieldMap};

/// Field-level diff between two flattened snapshots.
///
/// Walks the union of keys in ascending byte order. Key presence decides
/// `added` / `removed`; a value absent on one side is reported as `""`.
pub fn diff_field_maps(before: &FieldMap, after: &FieldMap) -> Vec<FieldChange> {
    let fields: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    fields
        .into_iter()
        .filter_map(|field| {
            let change_type = match (before.get(field), after.get(field)) {
                (None, Some(_)) => ChangeType::Added,
                (Some(_), None) => ChangeType::Removed,
                (Some(old), Some(new)) if old != new => ChangeType::Modified,
                _ => return None,
            };
            Some(FieldChange {
                field: field.clone(),
                before: before.get(field).cloned().unwrap_or_default(),
                after: after.get(field).cloned().unwrap_or_default(),
                change_type,
            })
        })
        .collect()
}

/// Replays a change list onto a field map. Used to check that a commit
/// chain is lossless.
#[cfg(test)]
pub fn apply_changes(base: &mut FieldMap, changes: &[FieldChange]) {
    for change in changes {
        match change.change_type {
            ChangeType::Removed => {
                base.remove(&change.field);
            }
            ChangeType::Added | ChangeType::Modified => {
                base.insert(change.field.clone(), change.after.clone());
            }
        }
    }
}
