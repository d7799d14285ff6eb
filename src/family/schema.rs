//! Data structures for per-individual variant rows and family tables.

use std::borrow::Cow;

use indexmap::IndexMap;

/// Column names used by the annotation tables.
pub mod columns {
    pub const CHROM: &str = "Chr";
    pub const START: &str = "Start";
    pub const END: &str = "End";
    pub const REF: &str = "Ref";
    pub const ALT: &str = "Alt";
    pub const ZYGOSITY: &str = "Zygosity";
    pub const GENE_REFGENE: &str = "Gene.refGene";
    pub const FUNC_REFGENE: &str = "Func.refGene";
    pub const EXONIC_FUNC_REFGENE: &str = "ExonicFunc.refGene";
    pub const EXONIC_FUNC_ENSGENE: &str = "ExonicFunc.ensGene";
    pub const EXONIC_FUNC_KNOWNGENE: &str = "ExonicFunc.knownGene";
    pub const FUNCTION_DESCRIPTION: &str = "Function_description";
    pub const HOM_IRANOME: &str = "Hom Iranome";
    pub const HET_IRANOME: &str = "Het Iranome";
    pub const HET_OUR_DB: &str = "Het Our DB";
    pub const CLNSIG: &str = "CLNSIG";
    pub const VALUE_INFO: &str = "ValueInfo2";
    /// Column holding the role, only present in the report.
    pub const PARENT: &str = "Parent";

    /// Columns that must be present in each input table.
    pub const REQUIRED: &[&str] = &[
        CHROM,
        START,
        END,
        REF,
        ALT,
        ZYGOSITY,
        GENE_REFGENE,
        FUNC_REFGENE,
        EXONIC_FUNC_REFGENE,
        HOM_IRANOME,
        HET_IRANOME,
        HET_OUR_DB,
    ];

    /// Columns that are mapped to typed fields when present.
    pub const OPTIONAL: &[&str] = &[
        EXONIC_FUNC_ENSGENE,
        EXONIC_FUNC_KNOWNGENE,
        FUNCTION_DESCRIPTION,
        CLNSIG,
        VALUE_INFO,
    ];
}

/// The sentinel value for "not applicable / missing".
pub const SENTINEL: &str = ".";

/// Position of an individual in the family.
///
/// The variant order is the lexicographic order of the names so that sorted
/// role tuples read e.g. `(child, mother)`.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    Child,
    Father,
    Mother,
}

/// Zygosity of a variant call.
#[derive(
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Zygosity {
    /// Heterozygous.
    #[default]
    Het,
    /// Homozygous.
    Hom,
}

/// The family members that take part in one analysis.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum FamilyShape {
    #[strum(serialize = "father-mother")]
    FatherMother,
    #[strum(serialize = "mother-child")]
    MotherChild,
    #[strum(serialize = "father-mother-child")]
    FatherMotherChild,
}

impl FamilyShape {
    /// Roles taking part, in the order their tables are concatenated.
    pub fn roles(&self) -> &'static [Role] {
        match self {
            FamilyShape::FatherMother => &[Role::Mother, Role::Father],
            FamilyShape::MotherChild => &[Role::Mother, Role::Child],
            FamilyShape::FatherMotherChild => &[Role::Father, Role::Mother, Role::Child],
        }
    }

    /// Roles in the order used for building the default output file name.
    pub fn name_roles(&self) -> &'static [Role] {
        match self {
            FamilyShape::FatherMother => &[Role::Father, Role::Mother],
            FamilyShape::MotherChild => &[Role::Child, Role::Mother],
            FamilyShape::FatherMotherChild => &[Role::Father, Role::Child, Role::Mother],
        }
    }
}

/// One called variant of one individual.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariantRow {
    /// Family role the row was read for.
    pub role: Role,
    /// Chromosome name.
    pub chrom: String,
    /// Start position.
    pub start: i32,
    /// End position.
    pub end: i32,
    /// Reference allele.
    pub reference: String,
    /// Alternative allele.
    pub alternative: String,
    /// Zygosity of the call.
    pub zygosity: Zygosity,
    /// RefGene gene symbol.
    pub gene: String,
    /// RefGene functional category, e.g., `"exonic"`.
    pub func_refgene: String,
    pub exonic_func_refgene: String,
    pub exonic_func_ensgene: String,
    pub exonic_func_knowngene: String,
    pub function_description: String,
    /// Homozygote count in Iranome, numeric or sentinel.
    pub hom_iranome: String,
    /// Heterozygote frequency in Iranome, numeric or sentinel.
    pub het_iranome: String,
    /// Heterozygote frequency in the in-house database, numeric or sentinel.
    pub het_our_db: String,
    /// ClinVar clinical significance.
    pub clinical_significance: String,
    /// Read support descriptor `GT:ref_depth,alt_depth[:...]`.
    pub read_support: String,
    /// All other columns of the input, in input order.
    pub extra: IndexMap<String, String>,
}

/// Identity of a variant across individuals, without the zygosity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantKey<'a> {
    pub het_iranome: &'a str,
    pub hom_iranome: &'a str,
    pub het_our_db: &'a str,
    pub chrom: &'a str,
    pub start: i32,
    pub end: i32,
    pub reference: &'a str,
    pub alternative: &'a str,
    pub gene: &'a str,
    pub exonic_func_refgene: &'a str,
}

/// Full match key of a call, the variant identity plus the zygosity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey<'a> {
    pub variant: VariantKey<'a>,
    pub zygosity: Zygosity,
}

impl VariantRow {
    pub fn variant_key(&self) -> VariantKey<'_> {
        VariantKey {
            het_iranome: &self.het_iranome,
            hom_iranome: &self.hom_iranome,
            het_our_db: &self.het_our_db,
            chrom: &self.chrom,
            start: self.start,
            end: self.end,
            reference: &self.reference,
            alternative: &self.alternative,
            gene: &self.gene,
            exonic_func_refgene: &self.exonic_func_refgene,
        }
    }

    pub fn match_key(&self) -> MatchKey<'_> {
        MatchKey {
            variant: self.variant_key(),
            zygosity: self.zygosity,
        }
    }

    /// Return the value for the given column, sentinel if unknown.
    pub fn value(&self, column: &str) -> Cow<'_, str> {
        use columns::*;

        let value: &str = match column {
            PARENT => return Cow::Owned(self.role.to_string()),
            START => return Cow::Owned(self.start.to_string()),
            END => return Cow::Owned(self.end.to_string()),
            ZYGOSITY => return Cow::Owned(self.zygosity.to_string()),
            CHROM => &self.chrom,
            REF => &self.reference,
            ALT => &self.alternative,
            GENE_REFGENE => &self.gene,
            FUNC_REFGENE => &self.func_refgene,
            EXONIC_FUNC_REFGENE => &self.exonic_func_refgene,
            EXONIC_FUNC_ENSGENE => &self.exonic_func_ensgene,
            EXONIC_FUNC_KNOWNGENE => &self.exonic_func_knowngene,
            FUNCTION_DESCRIPTION => &self.function_description,
            HOM_IRANOME => &self.hom_iranome,
            HET_IRANOME => &self.het_iranome,
            HET_OUR_DB => &self.het_our_db,
            CLNSIG => &self.clinical_significance,
            VALUE_INFO => &self.read_support,
            _ => self.extra.get(column).map(|s| s.as_str()).unwrap_or(SENTINEL),
        };
        Cow::Borrowed(value)
    }
}

/// The rows read for one role, together with the input column names.
#[derive(Debug, Clone, Default)]
pub struct RoleTable {
    pub role: Role,
    pub columns: Vec<String>,
    pub rows: Vec<VariantRow>,
}
