//! Predicates on variants shared by mother and child.

use super::{roles, select_groups, zygosities};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// How strictly the genotypes must agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotherChildMode {
    /// Child homozygous and mother heterozygous.
    Strict,
    /// Any zygosity, i.e., child and mother both carry the variant.
    Carrier,
}

/// Determine whether mother and child share the variant of the sorted group.
pub fn passes(group: &[&VariantRow], mode: MotherChildMode) -> bool {
    if roles(group) != [Role::Child, Role::Mother] {
        return false;
    }
    match mode {
        MotherChildMode::Strict => zygosities(group) == [Zygosity::Hom, Zygosity::Het],
        MotherChildMode::Carrier => true,
    }
}

/// Select rows of variants shared by mother and child, grouped by variant.
pub fn select(rows: &[&VariantRow], mode: MotherChildMode) -> Vec<usize> {
    select_groups(rows, |row| row.variant_key(), |group| passes(group, mode))
}
