//! Predicates on the variants of a couple (mother and father).

use super::{has_role, select_groups, select_rows};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// Determine whether both mother and father carry the variant.
pub fn passes(group: &[&VariantRow]) -> bool {
    has_role(group, Role::Mother) && has_role(group, Role::Father)
}

/// Select rows of variants shared by the couple, grouped by full match key.
pub fn select(rows: &[&VariantRow]) -> Vec<usize> {
    select_groups(rows, |row| row.match_key(), passes)
}

/// Select rows whose match key occurs exactly once.
pub fn select_not_shared(rows: &[&VariantRow]) -> Vec<usize> {
    select_groups(rows, |row| row.match_key(), |group| group.len() == 1)
}

/// Select the homozygous rows of the given role.
pub fn select_homozygous(rows: &[&VariantRow], role: Role) -> Vec<usize> {
    select_rows(rows, |row| row.role == role && row.zygosity == Zygosity::Hom)
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::family::classify::testing::row;
    use crate::family::schema::{Role, Zygosity};

    #[rstest]
    #[case(Role::Mother, Role::Father, true)]
    #[case(Role::Father, Role::Mother, true)]
    #[case(Role::Mother, Role::Mother, false)]
    #[case(Role::Mother, Role::Child, false)]
    fn couple_shares_variant(#[case] first: Role, #[case] second: Role, #[case] expected: bool) {
        let rows = vec![
            row(first, Zygosity::Het, 100, "A", "G"),
            row(second, Zygosity::Het, 100, "A", "G"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::passes(&refs), expected);
        let expected_rows: Vec<usize> = if expected { vec![0, 1] } else { vec![] };
        assert_eq!(super::select(&refs), expected_rows);
    }

    #[test]
    fn select_requires_same_zygosity() {
        let rows = vec![
            row(Role::Mother, Zygosity::Het, 100, "A", "G"),
            row(Role::Father, Zygosity::Hom, 100, "A", "G"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert!(super::select(&refs).is_empty());
    }

    #[test]
    fn select_not_shared() {
        let rows = vec![
            row(Role::Mother, Zygosity::Het, 100, "A", "G"),
            row(Role::Father, Zygosity::Het, 100, "A", "G"),
            row(Role::Father, Zygosity::Het, 200, "C", "T"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select_not_shared(&refs), vec![2]);
    }

    #[test]
    fn select_homozygous() {
        let rows = vec![
            row(Role::Mother, Zygosity::Hom, 100, "A", "G"),
            row(Role::Father, Zygosity::Hom, 100, "A", "G"),
            row(Role::Mother, Zygosity::Het, 200, "C", "T"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select_homozygous(&refs, Role::Mother), vec![0]);
        assert_eq!(super::select_homozygous(&refs, Role::Father), vec![1]);
    }
}
