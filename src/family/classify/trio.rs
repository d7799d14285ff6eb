//! Predicates on variants of father, mother and child.

use super::{has_role, select_groups, zygosities};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// Determine whether the child and at least one parent share the variant.
///
/// The sorted zygosities must start with `(hom, het)`.  The zygosity of a
/// third row is not taken into account.
pub fn passes(group: &[&VariantRow]) -> bool {
    if !has_role(group, Role::Child)
        || !(has_role(group, Role::Father) || has_role(group, Role::Mother))
    {
        return false;
    }
    zygosities(group).starts_with(&[Zygosity::Hom, Zygosity::Het])
}

/// Select rows of variants shared in the trio, grouped by variant.
pub fn select(rows: &[&VariantRow]) -> Vec<usize> {
    select_groups(rows, |row| row.variant_key(), passes)
}

/// Determine whether no parent is part of the group.
pub fn passes_child_only(group: &[&VariantRow]) -> bool {
    !has_role(group, Role::Father) && !has_role(group, Role::Mother)
}

/// Select rows of genes without any parent row.
pub fn select_child_only(rows: &[&VariantRow]) -> Vec<usize> {
    select_groups(rows, |row| row.gene.as_str(), passes_child_only)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::family::classify::testing::{gene_row, row};
    use crate::family::schema::{Role, Zygosity};

    #[rstest]
    #[case(&[(Role::Child, Zygosity::Hom), (Role::Mother, Zygosity::Het)], true)]
    #[case(&[(Role::Child, Zygosity::Hom), (Role::Father, Zygosity::Het)], true)]
    #[case(&[(Role::Child, Zygosity::Het), (Role::Mother, Zygosity::Het)], false)]
    #[case(&[(Role::Child, Zygosity::Hom), (Role::Mother, Zygosity::Hom)], false)]
    #[case(&[(Role::Father, Zygosity::Hom), (Role::Mother, Zygosity::Het)], false)]
    #[case(&[(Role::Child, Zygosity::Hom)], false)]
    #[case(
        &[(Role::Child, Zygosity::Hom), (Role::Father, Zygosity::Het), (Role::Mother, Zygosity::Het)],
        true
    )]
    #[case(
        &[(Role::Child, Zygosity::Hom), (Role::Father, Zygosity::Het), (Role::Mother, Zygosity::Hom)],
        true
    )]
    fn trio_shares_variant(#[case] members: &[(Role, Zygosity)], #[case] expected: bool) {
        let rows = members
            .iter()
            .map(|&(role, zygosity)| row(role, zygosity, 100, "A", "G"))
            .collect::<Vec<_>>();
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::passes(&refs), expected);
        assert_eq!(super::select(&refs).len(), if expected { rows.len() } else { 0 });
    }

    #[test]
    fn select_sorts_groups_by_role() {
        let rows = vec![
            row(Role::Mother, Zygosity::Het, 100, "A", "G"),
            row(Role::Child, Zygosity::Hom, 100, "A", "G"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select(&refs), vec![0, 1]);
    }

    #[test]
    fn select_child_only() {
        let rows = vec![
            gene_row(Role::Child, Zygosity::Het, "ATM", 1),
            gene_row(Role::Child, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Mother, Zygosity::Het, "CFTR", 3),
            gene_row(Role::Child, Zygosity::Hom, "TP53", 4),
            gene_row(Role::Child, Zygosity::Het, "TP53", 5),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select_child_only(&refs), vec![0, 3, 4]);
    }
}
