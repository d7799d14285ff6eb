//! Group-level predicates for classifying the rows of a `FamilyTable`.
//!
//! All functions work on a slice of row references (the current pool) and
//! return the positions of the selected rows within that slice, in slice
//! order.  Predicates on groups receive the group sorted by role.

use std::hash::Hash;

use indexmap::IndexMap;

use super::schema::{Role, VariantRow, Zygosity};

pub mod compound;
pub mod couple;
pub mod dangerous;
pub mod mother_child;
pub mod pathogenic;
pub mod trio;

/// Group the rows by `key`, keeping groups in order of first appearance.
pub fn group_by<'a, K, F>(rows: &[&'a VariantRow], key: F) -> IndexMap<K, Vec<usize>>
where
    K: Hash + Eq,
    F: Fn(&'a VariantRow) -> K,
{
    let mut groups: IndexMap<K, Vec<usize>> = IndexMap::new();
    for (i, &row) in rows.iter().enumerate() {
        groups.entry(key(row)).or_default().push(i);
    }
    groups
}

/// Select all rows of the groups for which `predicate` holds.
pub fn select_groups<'a, K, F, P>(rows: &[&'a VariantRow], key: F, predicate: P) -> Vec<usize>
where
    K: Hash + Eq,
    F: Fn(&'a VariantRow) -> K,
    P: Fn(&[&'a VariantRow]) -> bool,
{
    let mut selected = group_by(rows, key)
        .into_values()
        .filter(|positions| predicate(&sorted_by_role(rows, positions)))
        .flatten()
        .collect::<Vec<_>>();
    selected.sort_unstable();
    selected
}

/// Select the rows for which `predicate` holds.
pub fn select_rows<P>(rows: &[&VariantRow], predicate: P) -> Vec<usize>
where
    P: Fn(&VariantRow) -> bool,
{
    rows.iter()
        .enumerate()
        .filter(|&(_, &row)| predicate(row))
        .map(|(i, _)| i)
        .collect()
}

/// The rows at `positions`, stably sorted by role.
pub fn sorted_by_role<'a>(rows: &[&'a VariantRow], positions: &[usize]) -> Vec<&'a VariantRow> {
    let mut group = positions.iter().map(|&i| rows[i]).collect::<Vec<_>>();
    group.sort_by_key(|row| row.role);
    group
}

/// Roles of the group members, in group order.
pub fn roles(group: &[&VariantRow]) -> Vec<Role> {
    group.iter().map(|row| row.role).collect()
}

/// Zygosities of the group members, in group order.
pub fn zygosities(group: &[&VariantRow]) -> Vec<Zygosity> {
    group.iter().map(|row| row.zygosity).collect()
}

/// Whether the group contains a row of the given role.
pub fn has_role(group: &[&VariantRow], role: Role) -> bool {
    group.iter().any(|row| row.role == role)
}
