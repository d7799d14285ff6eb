//! Assembly of the report sections from the ordered stage pipeline.
//!
//! Each family shape defines an ordered list of stages.  A stage selects rows
//! from the normal table, the pathogenic table, or both.  Rows selected by a
//! claiming stage are withheld from the later stages that work on the pool of
//! unclaimed rows.  Per-row checks and the child-only check always see the
//! whole table.

use std::collections::HashSet;

use super::aggregate::{sort_by_gene, FamilyTable};
use super::classify::mother_child::MotherChildMode;
use super::classify::{compound, couple, dangerous, mother_child, pathogenic, trio};
use super::moi::{InheritanceMap, ModeOfInheritance};
use super::schema::{FamilyShape, Role, VariantRow};

/// The table(s) a stage selects from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Normal,
    Pathogenic,
    Both,
}

/// The table(s) whose selected rows a stage withholds from later stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    Nothing,
    Normal,
    All,
}

impl Claim {
    fn covers(&self, source: Source) -> bool {
        match self {
            Claim::Nothing => false,
            Claim::Normal => source == Source::Normal,
            Claim::All => true,
        }
    }
}

/// The classifier applied by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    CoupleShared,
    Compound,
    Dangerous,
    DangerousIn(Role),
    NotShared,
    HomozygousIn(Role),
    MotherChild(MotherChildMode),
    TrioShared,
    ChildOnly,
    ChildCompound(&'static [Role]),
    PathogenicMode(ModeOfInheritance),
}

impl Selector {
    /// Whether the selector is evaluated on all rows, ignoring claims.
    ///
    /// Holds for the per-row checks and for the child-only check, which
    /// needs all parent rows of a gene.
    pub fn sees_whole_table(&self) -> bool {
        matches!(
            self,
            Selector::Dangerous
                | Selector::DangerousIn(_)
                | Selector::HomozygousIn(_)
                | Selector::ChildOnly
        )
    }

    /// Positions of the selected rows within `rows`.
    pub fn apply(&self, rows: &[&VariantRow], inheritance: &InheritanceMap) -> Vec<usize> {
        match *self {
            Selector::CoupleShared => couple::select(rows),
            Selector::Compound => compound::select(rows),
            Selector::Dangerous => dangerous::select(rows),
            Selector::DangerousIn(role) => dangerous::select_in(rows, role),
            Selector::NotShared => couple::select_not_shared(rows),
            Selector::HomozygousIn(role) => couple::select_homozygous(rows, role),
            Selector::MotherChild(mode) => mother_child::select(rows, mode),
            Selector::TrioShared => trio::select(rows),
            Selector::ChildOnly => trio::select_child_only(rows),
            Selector::ChildCompound(parents) => compound::select_child(rows, parents),
            Selector::PathogenicMode(mode) => pathogenic::select(rows, inheritance, mode),
        }
    }
}

/// One step of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub label: &'static str,
    pub source: Source,
    pub selector: Selector,
    /// Which selected rows are removed from the pool of later stages.
    pub claims: Claim,
}

const fn stage(label: &'static str, source: Source, selector: Selector, claims: Claim) -> Stage {
    Stage {
        label,
        source,
        selector,
        claims,
    }
}

const FATHER_MOTHER: &[Stage] = &[
    stage("shared in couple", Source::Both, Selector::CoupleShared, Claim::Nothing),
    stage("shared gene, possible compound", Source::Normal, Selector::Compound, Claim::Nothing),
    stage("dangerous in either partner", Source::Normal, Selector::Dangerous, Claim::Nothing),
    stage("pathogenic, not shared", Source::Pathogenic, Selector::NotShared, Claim::Nothing),
    stage(
        "to review in father",
        Source::Pathogenic,
        Selector::HomozygousIn(Role::Father),
        Claim::Nothing,
    ),
    stage(
        "to review in mother",
        Source::Pathogenic,
        Selector::HomozygousIn(Role::Mother),
        Claim::Nothing,
    ),
];

const MOTHER_CHILD: &[Stage] = &[
    stage(
        "shared in mother and child",
        Source::Both,
        Selector::MotherChild(MotherChildMode::Strict),
        Claim::Normal,
    ),
    stage("not shared, child only", Source::Both, Selector::ChildOnly, Claim::Nothing),
    stage(
        "carrier candidates in mother and child",
        Source::Normal,
        Selector::MotherChild(MotherChildMode::Carrier),
        Claim::Nothing,
    ),
    stage(
        "pathogenic, to review (AR)",
        Source::Pathogenic,
        Selector::PathogenicMode(ModeOfInheritance::AutosomalRecessive),
        Claim::All,
    ),
    stage(
        "pathogenic, to review (AD)",
        Source::Pathogenic,
        Selector::PathogenicMode(ModeOfInheritance::AutosomalDominant),
        Claim::Nothing,
    ),
];

const FATHER_MOTHER_CHILD: &[Stage] = &[
    stage(
        "shared in father, mother and child",
        Source::Both,
        Selector::TrioShared,
        Claim::All,
    ),
    stage("not shared, child only", Source::Both, Selector::ChildOnly, Claim::Nothing),
    stage(
        "compound in child",
        Source::Normal,
        Selector::ChildCompound(&[Role::Mother, Role::Father]),
        Claim::Nothing,
    ),
    stage(
        "dangerous in child",
        Source::Normal,
        Selector::DangerousIn(Role::Child),
        Claim::Nothing,
    ),
];

/// The ordered stages for a family shape.
pub fn stages(shape: FamilyShape) -> &'static [Stage] {
    match shape {
        FamilyShape::FatherMother => FATHER_MOTHER,
        FamilyShape::MotherChild => MOTHER_CHILD,
        FamilyShape::FatherMotherChild => FATHER_MOTHER_CHILD,
    }
}

/// A labeled report section.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub label: String,
    pub rows: Vec<VariantRow>,
}

/// The rows of one table that have not been claimed yet.
struct Pool<'a> {
    table: &'a FamilyTable,
    claimed: HashSet<usize>,
}

impl<'a> Pool<'a> {
    fn new(table: &'a FamilyTable) -> Self {
        Self {
            table,
            claimed: HashSet::new(),
        }
    }

    /// Apply `selector` to the unclaimed rows, or to all rows if the selector
    /// sees the whole table, returning table indices.
    fn select(&self, selector: &Selector, inheritance: &InheritanceMap) -> Vec<usize> {
        let whole = selector.sees_whole_table();
        let (indices, rows): (Vec<usize>, Vec<&VariantRow>) = self
            .table
            .rows()
            .iter()
            .enumerate()
            .filter(|(i, _)| whole || !self.claimed.contains(i))
            .unzip();
        selector
            .apply(&rows, inheritance)
            .into_iter()
            .map(|pos| indices[pos])
            .collect()
    }

    fn claim(&mut self, indices: &[usize]) {
        self.claimed.extend(indices.iter().copied());
    }

    fn rows(&self, indices: &[usize]) -> Vec<VariantRow> {
        let rows = self.table.rows();
        indices.iter().map(|&i| rows[i].clone()).collect()
    }
}

/// Run the stage pipeline of `shape` on the filtered tables.
pub fn classify(
    shape: FamilyShape,
    normal: &FamilyTable,
    pathogenic: &FamilyTable,
    inheritance: &InheritanceMap,
) -> Vec<ResultSet> {
    let mut normal_pool = Pool::new(normal);
    let mut pathogenic_pool = Pool::new(pathogenic);

    let mut result = Vec::new();
    for stage in stages(shape) {
        let normal_selected = match stage.source {
            Source::Normal | Source::Both => normal_pool.select(&stage.selector, inheritance),
            Source::Pathogenic => Vec::new(),
        };
        let pathogenic_selected = match stage.source {
            Source::Pathogenic | Source::Both => {
                pathogenic_pool.select(&stage.selector, inheritance)
            }
            Source::Normal => Vec::new(),
        };

        let mut rows = normal_pool.rows(&normal_selected);
        rows.extend(pathogenic_pool.rows(&pathogenic_selected));
        if stage.source == Source::Both {
            sort_by_gene(&mut rows);
        }
        tracing::debug!(
            "stage {:?} selected {} normal and {} pathogenic rows",
            stage.label,
            normal_selected.len(),
            pathogenic_selected.len()
        );

        if stage.claims.covers(Source::Normal) {
            normal_pool.claim(&normal_selected);
        }
        if stage.claims.covers(Source::Pathogenic) {
            pathogenic_pool.claim(&pathogenic_selected);
        }
        result.push(ResultSet {
            label: stage.label.to_string(),
            rows,
        });
    }

    result
}
