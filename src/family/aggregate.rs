//! Merging of the per-role tables into one family table.

use std::collections::HashMap;

use super::schema::{Role, RoleTable, VariantRow};

/// The merged rows of all family members, ordered by gene.
#[derive(Debug, Clone, Default)]
pub struct FamilyTable {
    /// Union of the input column names, in order of first appearance.
    columns: Vec<String>,
    rows: Vec<VariantRow>,
}

impl FamilyTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[VariantRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate the rows of one role, in table order.
    pub fn by_role(&self, role: Role) -> impl Iterator<Item = &VariantRow> + '_ {
        self.rows.iter().filter(move |row| row.role == role)
    }
}

/// Merge the role tables into a `FamilyTable`.
///
/// Rows are concatenated in the order given and then stably sorted by gene
/// and by the occurrence index of the row among the rows of the same role
/// in the same gene.  Within a gene the roles thus alternate, e.g.
/// `mother#0, father#0, mother#1, ...`.
pub fn aggregate<I>(tables: I) -> FamilyTable
where
    I: IntoIterator<Item = RoleTable>,
{
    let mut columns: Vec<String> = Vec::new();
    let mut rows = Vec::new();
    for table in tables {
        for column in table.columns {
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        rows.extend(table.rows);
    }

    let mut seen: HashMap<(String, Role), usize> = HashMap::new();
    let mut ranked = rows
        .into_iter()
        .map(|row| {
            let counter = seen.entry((row.gene.clone(), row.role)).or_default();
            let rank = *counter;
            *counter += 1;
            (rank, row)
        })
        .collect::<Vec<_>>();
    ranked.sort_by(|(lhs_rank, lhs), (rhs_rank, rhs)| {
        (&lhs.gene, lhs_rank).cmp(&(&rhs.gene, rhs_rank))
    });

    FamilyTable {
        columns,
        rows: ranked.into_iter().map(|(_, row)| row).collect(),
    }
}

/// Stably sort rows by gene symbol.
pub fn sort_by_gene(rows: &mut [VariantRow]) {
    rows.sort_by(|lhs, rhs| lhs.gene.cmp(&rhs.gene));
}
