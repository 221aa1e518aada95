//! Cohort selection: inclusion filtering, case/control labeling, and
//! removal of samples with missing covariate values.

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};
use crate::filter::Expr;
use crate::metadata::MetadataTable;

/// Name of the column recording each sample's resolved role
pub const CASE_CONTROL_COLUMN: &str = "case_control";

/// Role of a sample in the matching run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A sample requiring a matched control
    Case,
    /// A sample eligible to be matched to exactly one case
    Control,
    /// A sample retained in the table but ignored by the matcher
    Excluded,
}

impl Role {
    /// Label written to the `case_control` column
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Case => "case",
            Self::Control => "control",
            Self::Excluded => "excluded",
        }
    }
}

/// Configuration for building the matching cohort
#[derive(Debug, Clone)]
pub struct CohortConfig {
    /// Optional inclusion filter; samples failing it are dropped entirely
    pub keep: Option<Expr>,
    /// Samples satisfying this expression become cases
    pub case: Expr,
    /// Samples satisfying this expression become controls
    pub control: Expr,
    /// Cell values treated as missing when they appear in a match column
    pub null_values: Vec<String>,
}

/// Apply the inclusion filter, returning the retained table
pub fn apply_keep(table: &MetadataTable, keep: &Expr) -> Result<MetadataTable> {
    let mask = keep.mask(table)?;
    let kept = table.filter(&mask)?;
    if kept.is_empty() {
        return Err(MatchError::Validation(
            "no samples fulfill the keep queries".to_string(),
        ));
    }
    info!(
        "Kept {} of {} samples after exclusion filtering",
        kept.len(),
        table.len()
    );
    Ok(kept)
}

/// Resolve each sample's role from the case and control expressions.
///
/// The control expression is applied last, so a sample satisfying both
/// expressions is labeled control.
pub fn label_roles(table: &MetadataTable, case: &Expr, control: &Expr) -> Result<Vec<Role>> {
    let case_mask = case.mask(table)?;
    let control_mask = control.mask(table)?;

    let mut roles = vec![Role::Excluded; table.len()];
    for (role, is_case) in roles.iter_mut().zip(&case_mask) {
        if *is_case {
            *role = Role::Case;
        }
    }
    for (role, is_control) in roles.iter_mut().zip(&control_mask) {
        if *is_control {
            *role = Role::Control;
        }
    }

    let cases = roles.iter().filter(|role| **role == Role::Case).count();
    let controls = roles.iter().filter(|role| **role == Role::Control).count();
    if cases == 0 {
        return Err(MatchError::Validation(
            "no samples fulfill the case queries".to_string(),
        ));
    }
    if controls == 0 {
        return Err(MatchError::Validation(
            "no samples fulfill the control queries".to_string(),
        ));
    }
    info!(
        "Labeled {cases} cases and {controls} controls ({} excluded)",
        table.len() - cases - controls
    );
    Ok(roles)
}

/// Remove every sample, regardless of role, holding a null placeholder in
/// one of the given match columns. Returns the filtered table and roles.
pub fn drop_missing(
    table: &MetadataTable,
    roles: &[Role],
    columns: &[String],
    null_values: &[String],
) -> Result<(MetadataTable, Vec<Role>)> {
    let mut mask = vec![true; table.len()];
    for column in columns {
        let position = table.column_position(column)?;
        for (row, keep) in mask.iter_mut().enumerate() {
            if *keep
                && null_values
                    .iter()
                    .any(|null| null == table.cell(row, position))
            {
                *keep = false;
            }
        }
    }

    let kept_roles: Vec<Role> = mask
        .iter()
        .zip(roles)
        .filter_map(|(keep, role)| keep.then_some(*role))
        .collect();
    let kept = table.filter(&mask)?;
    let dropped = table.len() - kept.len();
    if dropped > 0 {
        info!("Dropped {dropped} samples with missing values in match columns");
    }
    Ok((kept, kept_roles))
}

/// Run the full cohort pipeline: keep filter, role labeling, then removal
/// of samples with missing values in the given match columns.
pub fn build_cohort(
    table: &MetadataTable,
    config: &CohortConfig,
    match_columns: &[String],
) -> Result<(MetadataTable, Vec<Role>)> {
    let table = match &config.keep {
        Some(keep) => apply_keep(table, keep)?,
        None => table.clone(),
    };
    let roles = label_roles(&table, &config.case, &config.control)?;
    drop_missing(&table, &roles, match_columns, &config.null_values)
}

/// Append the `case_control` column recording each sample's role
pub fn apply_roles(table: &mut MetadataTable, roles: &[Role]) -> Result<()> {
    let values = roles.iter().map(|role| role.as_str().to_string()).collect();
    table.add_column(CASE_CONTROL_COLUMN, values)
}
