//! Variants with a severe functional consequence.

use super::select_rows;
use crate::family::schema::{Role, VariantRow};

/// Functional categories considered severe.
pub const SEVERE_CONSEQUENCES: &[&str] = &[
    "frameshift insertion",
    "frameshift deletion",
    "stopgain",
    "stoploss",
    "splicing",
];

/// Determine whether any functional annotation of the row is severe.
pub fn passes(row: &VariantRow) -> bool {
    [
        &row.exonic_func_refgene,
        &row.exonic_func_ensgene,
        &row.exonic_func_knowngene,
        &row.func_refgene,
        &row.function_description,
    ]
    .iter()
    .any(|value| SEVERE_CONSEQUENCES.contains(&value.as_str()))
}

pub fn select(rows: &[&VariantRow]) -> Vec<usize> {
    select_rows(rows, passes)
}

/// Select rows of the given role with a severe consequence.
pub fn select_in(rows: &[&VariantRow], role: Role) -> Vec<usize> {
    select_rows(rows, |row| row.role == role && passes(row))
}
