//! Candidates for compound heterozygosity.

use std::collections::{HashMap, HashSet};

use itertools::Itertools;

use super::{roles, select_groups};
use crate::family::schema::{Role, VariantRow, Zygosity};

/// Determine whether a gene group is a candidate for compound heterozygosity
/// in the couple.
///
/// The group must consist of exactly one mother and one father row with
/// different variants.
pub fn passes(group: &[&VariantRow]) -> bool {
    group.len() == 2
        && roles(group) == [Role::Father, Role::Mother]
        && group[0].match_key() != group[1].match_key()
}

/// Select rows of compound candidate genes, grouped by gene.
pub fn select(rows: &[&VariantRow]) -> Vec<usize> {
    select_groups(rows, |row| row.gene.as_str(), passes)
}

/// Child heterozygous rows in genes with more than one of them.
///
/// Genes are grouped consecutively as the rows are sorted by gene.
pub fn child_het_candidates(rows: &[&VariantRow]) -> Vec<usize> {
    let mut result = Vec::new();
    let child_het = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.role == Role::Child && row.zygosity == Zygosity::Het);
    for (_, group) in &child_het.group_by(|&(_, &row)| row.gene.as_str()) {
        let group = group.map(|(i, _)| i).collect::<Vec<_>>();
        if group.len() > 1 {
            result.extend(group);
        }
    }
    result
}

/// Positions `(start, end, gene)` of the non-homozygous rows per role.
fn parent_positions<'a>(
    rows: &[&'a VariantRow],
    parents: &[Role],
) -> HashMap<Role, HashSet<(i32, i32, &'a str)>> {
    let mut result: HashMap<Role, HashSet<_>> = HashMap::new();
    for &row in rows {
        if parents.contains(&row.role) && row.zygosity != Zygosity::Hom {
            result
                .entry(row.role)
                .or_default()
                .insert((row.start, row.end, row.gene.as_str()));
        }
    }
    result
}

/// Select child compound candidates carried by each of the `parents`.
///
/// A candidate is a child heterozygous row in a gene with more than one such
/// row for which each parent has a non-homozygous row at the same start, end
/// and gene.
pub fn select_child(rows: &[&VariantRow], parents: &[Role]) -> Vec<usize> {
    let positions = parent_positions(rows, parents);
    child_het_candidates(rows)
        .into_iter()
        .filter(|&i| {
            let key = (rows[i].start, rows[i].end, rows[i].gene.as_str());
            parents.iter().all(|parent| {
                positions
                    .get(parent)
                    .map(|set| set.contains(&key))
                    .unwrap_or(false)
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::family::classify::testing::{gene_row, row};
    use crate::family::schema::{Role, Zygosity};

    #[rstest]
    #[case(200, "C", "T", true)]
    #[case(100, "A", "G", false)]
    #[case(100, "A", "T", true)]
    fn compound_candidate(
        #[case] start: i32,
        #[case] reference: &str,
        #[case] alternative: &str,
        #[case] expected: bool,
    ) {
        let rows = vec![
            row(Role::Father, Zygosity::Het, start, reference, alternative),
            row(Role::Mother, Zygosity::Het, 100, "A", "G"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::passes(&refs), expected);
    }

    #[test]
    fn identical_variants_are_couple_shared_instead() {
        let rows = vec![
            row(Role::Mother, Zygosity::Het, 100, "A", "G"),
            row(Role::Father, Zygosity::Het, 100, "A", "G"),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert!(super::select(&refs).is_empty());
        assert_eq!(crate::family::classify::couple::select(&refs), vec![0, 1]);
    }

    #[rstest]
    #[case(&[Role::Mother, Role::Father, Role::Father], false)]
    #[case(&[Role::Mother, Role::Mother], false)]
    #[case(&[Role::Mother], false)]
    #[case(&[Role::Father, Role::Mother], true)]
    fn compound_candidate_requires_one_row_per_parent(
        #[case] group_roles: &[Role],
        #[case] expected: bool,
    ) {
        let rows = group_roles
            .iter()
            .enumerate()
            .map(|(i, &role)| gene_row(role, Zygosity::Het, "CFTR", 100 * (i as i32 + 1)))
            .collect::<Vec<_>>();
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::passes(&refs), expected);
    }

    #[test]
    fn select_by_gene() {
        let rows = vec![
            gene_row(Role::Mother, Zygosity::Het, "ATM", 1),
            gene_row(Role::Father, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Mother, Zygosity::Het, "CFTR", 3),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select(&refs), vec![1, 2]);
    }

    #[test]
    fn child_het_candidates() {
        let rows = vec![
            gene_row(Role::Child, Zygosity::Het, "ATM", 1),
            gene_row(Role::Child, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Mother, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Child, Zygosity::Het, "CFTR", 3),
            gene_row(Role::Child, Zygosity::Hom, "TP53", 4),
            gene_row(Role::Child, Zygosity::Het, "TP53", 5),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::child_het_candidates(&refs), vec![1, 3]);
    }

    #[rstest]
    #[case(&[Role::Mother], vec![1, 3])]
    #[case(&[Role::Mother, Role::Father], vec![1])]
    fn select_child(#[case] parents: &[Role], #[case] expected: Vec<usize>) {
        let rows = vec![
            gene_row(Role::Child, Zygosity::Het, "ATM", 1),
            gene_row(Role::Child, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Mother, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Child, Zygosity::Het, "CFTR", 3),
            gene_row(Role::Father, Zygosity::Het, "CFTR", 2),
            gene_row(Role::Mother, Zygosity::Het, "CFTR", 3),
            gene_row(Role::Father, Zygosity::Hom, "CFTR", 3),
        ];
        let refs = rows.iter().collect::<Vec<_>>();

        assert_eq!(super::select_child(&refs, parents), expected);
    }
}
