//! Implementation of the `family` sub command.

pub mod aggregate;
pub mod assemble;
pub mod classify;
pub mod filter;
pub mod moi;
pub mod normalize;
pub mod output;
pub mod schema;

use self::filter::{FilterSettings, FilterStats};
use self::moi::InheritanceMap;
use self::schema::{FamilyShape, Role, RoleTable};
use crate::common::{self, default_output_name, load_json_settings};
use crate::err::ArgError;

/// Command line arguments for `family` sub command.
#[derive(Debug, clap::Parser)]
#[command(about = "Filter the variants of a family", long_about = None)]
pub struct Args {
    /// The family members to analyze.
    #[arg(long, value_enum)]
    pub shape: FamilyShape,
    /// Path to the mother's variant table.
    #[arg(long)]
    pub path_mother: Option<String>,
    /// Path to the father's variant table.
    #[arg(long)]
    pub path_father: Option<String>,
    /// Path to the child's variant table.
    #[arg(long)]
    pub path_child: Option<String>,
    /// Path to the mother's pathogenic variant table.
    #[arg(long)]
    pub path_mother_pathogenic: Option<String>,
    /// Path to the father's pathogenic variant table.
    #[arg(long)]
    pub path_father_pathogenic: Option<String>,
    /// Path to the child's pathogenic variant table.
    #[arg(long)]
    pub path_child_pathogenic: Option<String>,
    /// Path to the gene to mode of inheritance table.
    #[arg(long)]
    pub path_inheritance: Option<String>,
    /// Keep intronic variants.
    #[arg(long, default_value_t = false)]
    pub keep_intronic: bool,
    /// Filter settings as JSON or @ with path to JSON file.
    #[arg(long)]
    pub settings: Option<String>,
    /// Path to the output TSV file, derived from the input names if omitted.
    #[arg(long)]
    pub path_output: Option<String>,
}

impl Args {
    /// Path of the normal table for `role`.
    fn path_normal(&self, role: Role) -> Option<&str> {
        match role {
            Role::Mother => self.path_mother.as_deref(),
            Role::Father => self.path_father.as_deref(),
            Role::Child => self.path_child.as_deref(),
        }
    }

    /// Path of the pathogenic table for `role`.
    fn path_pathogenic(&self, role: Role) -> Option<&str> {
        match role {
            Role::Mother => self.path_mother_pathogenic.as_deref(),
            Role::Father => self.path_father_pathogenic.as_deref(),
            Role::Child => self.path_child_pathogenic.as_deref(),
        }
    }

    /// The normal and pathogenic paths for each role of the shape.
    fn input_paths(&self) -> Result<Vec<(Role, &str, &str)>, ArgError> {
        let missing = |role: Role, kind| ArgError::MissingTable {
            shape: self.shape.to_string(),
            role: role.to_string(),
            kind,
        };
        self.shape
            .roles()
            .iter()
            .map(|&role| {
                let normal = self.path_normal(role).ok_or_else(|| missing(role, "normal"))?;
                let pathogenic = self
                    .path_pathogenic(role)
                    .ok_or_else(|| missing(role, "pathogenic"))?;
                Ok((role, normal, pathogenic))
            })
            .collect()
    }

    /// The output path given on the command line or the default name.
    fn path_output(&self) -> String {
        match &self.path_output {
            Some(path) => path.clone(),
            None => {
                let paths = self
                    .shape
                    .name_roles()
                    .iter()
                    .filter_map(|&role| self.path_normal(role))
                    .collect::<Vec<_>>();
                default_output_name(&paths)
            }
        }
    }

    fn filter_settings(&self) -> Result<FilterSettings, anyhow::Error> {
        let mut settings = match &self.settings {
            Some(value) => load_json_settings::<FilterSettings>(value)?,
            None => FilterSettings::default(),
        };
        if self.keep_intronic {
            settings.keep_intronic = true;
        }
        Ok(settings)
    }
}

fn log_stats(role: Role, kind: &str, stats: &FilterStats) {
    tracing::info!(
        "{} filter for {}: {}/{} passed ({} malformed)",
        kind,
        role,
        stats.passed,
        stats.total,
        stats.malformed
    );
}

/// Read and filter the normal and pathogenic tables of one role.
fn load_role(
    settings: &FilterSettings,
    role: Role,
    path_normal: &str,
    path_pathogenic: &str,
) -> Result<(RoleTable, RoleTable), anyhow::Error> {
    let table = normalize::read_table(path_normal, role)?;
    let (rows, stats) = filter::filter_normal(settings, table.rows);
    log_stats(table.role, "normal", &stats);
    let normal = RoleTable { rows, ..table };

    let table = normalize::read_table(path_pathogenic, role)?;
    let (rows, stats) = filter::filter_pathogenic(settings, table.rows);
    log_stats(table.role, "pathogenic", &stats);
    let pathogenic = RoleTable { rows, ..table };

    Ok((normal, pathogenic))
}

/// Union of the column names, in order of first appearance.
fn merge_columns(lhs: &[String], rhs: &[String]) -> Vec<String> {
    let mut result = lhs.to_vec();
    for column in rhs {
        if !result.contains(column) {
            result.push(column.clone());
        }
    }
    result
}

/// Main entry point for `family` sub command.
pub fn run(args_common: &common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("args_common = {:#?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    let settings = args.filter_settings()?;
    tracing::info!("settings = {:?}", &settings);
    let inputs = args.input_paths()?;

    tracing::info!("loading tables...");
    let mut normal_tables = Vec::new();
    let mut pathogenic_tables = Vec::new();
    for (role, path_normal, path_pathogenic) in inputs {
        let (normal, pathogenic) = load_role(&settings, role, path_normal, path_pathogenic)?;
        normal_tables.push(normal);
        pathogenic_tables.push(pathogenic);
    }
    let normal = aggregate::aggregate(normal_tables);
    let pathogenic = aggregate::aggregate(pathogenic_tables);
    tracing::info!(
        "... loaded {} normal and {} pathogenic rows",
        normal.len(),
        pathogenic.len()
    );
    for role in args.shape.roles() {
        tracing::debug!(
            "  {}: {} normal, {} pathogenic",
            role,
            normal.by_role(*role).count(),
            pathogenic.by_role(*role).count()
        );
    }
    common::trace_rss_now();

    let inheritance = match &args.path_inheritance {
        Some(path) => InheritanceMap::from_path(path)?,
        None => InheritanceMap::default(),
    };
    if inheritance.is_empty() {
        tracing::warn!("no mode of inheritance known, all genes are treated as AR");
    }

    tracing::info!("classifying variants...");
    let sets = assemble::classify(args.shape, &normal, &pathogenic, &inheritance);
    for set in &sets {
        tracing::info!("  {}: {} rows", set.label, set.rows.len());
    }

    let columns = merge_columns(normal.columns(), pathogenic.columns());
    output::write_report(args.path_output(), &columns, &sets)?;

    tracing::info!(
        "All of `family` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
