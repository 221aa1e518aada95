//! Input validation for the matching engine
//!
//! Checks the cohort and conditions before any matching work starts.

use crate::algorithm::cohort::Role;
use crate::algorithm::matching::criteria::MatchCondition;
use crate::error::{MatchError, Result};
use crate::metadata::MetadataTable;

/// Validate the cohort and conditions before matching
pub fn validate_inputs(
    table: &MetadataTable,
    roles: &[Role],
    conditions: &[MatchCondition],
) -> Result<()> {
    if roles.len() != table.len() {
        return Err(MatchError::Validation(format!(
            "role count ({}) doesn't match table row count ({})",
            roles.len(),
            table.len()
        )));
    }

    if conditions.is_empty() {
        return Err(MatchError::Validation(
            "no match conditions configured".to_string(),
        ));
    }
    for condition in conditions {
        table.column_position(&condition.column)?;
    }

    if !roles.iter().any(|role| *role == Role::Case) {
        return Err(MatchError::Validation(
            "cohort contains no case samples".to_string(),
        ));
    }
    if !roles.iter().any(|role| *role == Role::Control) {
        return Err(MatchError::Validation(
            "cohort contains no control samples".to_string(),
        ));
    }

    Ok(())
}
