//! Pathogenic variants to review, matched against the gene's mode of
//! inheritance.

use super::{roles, select_groups, zygosities};
use crate::family::moi::{InheritanceMap, ModeOfInheritance};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// The expected sorted `(child, mother)` zygosities for a mode.
fn expected_zygosities(mode: ModeOfInheritance) -> [Zygosity; 2] {
    match mode {
        ModeOfInheritance::AutosomalRecessive => [Zygosity::Hom, Zygosity::Het],
        ModeOfInheritance::AutosomalDominant => [Zygosity::Het, Zygosity::Het],
    }
}

/// Determine whether the group matches the given mode of inheritance.
pub fn passes(group: &[&VariantRow], inheritance: &InheritanceMap, mode: ModeOfInheritance) -> bool {
    roles(group) == [Role::Child, Role::Mother]
        && zygosities(group) == expected_zygosities(mode)
        && inheritance.mode_of(&group[0].gene) == mode
}

/// Select rows of mother/child variants matching `mode`, grouped by variant.
pub fn select(
    rows: &[&VariantRow],
    inheritance: &InheritanceMap,
    mode: ModeOfInheritance,
) -> Vec<usize> {
    select_groups(
        rows,
        |row| row.variant_key(),
        |group| passes(group, inheritance, mode),
    )
}
