//! Matching orchestration
//!
//! Wires the pipeline together: validation, compatibility evaluation,
//! scarcity ranking, case ordering, the stable-marriage loop, and the
//! `matched_to` write-back.

use std::time::Instant;

use itertools::Itertools;
use log::info;

use crate::algorithm::cohort::Role;
use crate::algorithm::matching::compatibility::CompatibilityEvaluator;
use crate::algorithm::matching::criteria::MatchingConfig;
use crate::algorithm::matching::ranking::{count_scarcity, order_cases, rank_preferences};
use crate::algorithm::matching::stable::stable_marriage;
use crate::algorithm::matching::types::{
    MATCHED_TO_COLUMN, MatchedPair, MatchingResult, UNMATCHED,
};
use crate::algorithm::matching::validation::validate_inputs;
use crate::error::{MatchError, Result};
use crate::metadata::MetadataTable;

/// Matcher for pairing case samples with controls
#[derive(Debug)]
pub struct Matcher {
    /// Matching configuration
    config: MatchingConfig,
}

impl Matcher {
    /// Create a new matcher with the given configuration
    #[must_use]
    pub const fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    /// Match every case in the cohort to a unique control.
    ///
    /// `roles` must hold one entry per table row. Returns the matched pairs
    /// in case input order; the table itself is not modified (see
    /// [`apply_matches`]).
    pub fn match_cohort(&self, table: &MetadataTable, roles: &[Role]) -> Result<MatchingResult> {
        let start_time = Instant::now();

        validate_inputs(table, roles, &self.config.conditions)?;

        // Cohorts in input order; ordering fixes every downstream tie-break
        let case_rows: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter_map(|(row, role)| (*role == Role::Case).then_some(row))
            .collect();
        let control_rows: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter_map(|(row, role)| (*role == Role::Control).then_some(row))
            .collect();

        info!(
            "Matching {} cases against a pool of {} controls on [{}]",
            case_rows.len(),
            control_rows.len(),
            self.config.conditions.iter().map(ToString::to_string).join(", ")
        );

        let evaluator =
            CompatibilityEvaluator::new(table, &self.config.conditions, control_rows.clone())?;
        let map = evaluator.build_map(
            &case_rows,
            self.config.use_parallel,
            self.config.show_progress,
        )?;

        let counts = count_scarcity(&map);
        let ranked = rank_preferences(&map, &counts);
        let free = order_cases(&ranked);
        let assignment = stable_marriage(free, &ranked, &counts)?;

        let mut pairs = Vec::with_capacity(assignment.len());
        let mut unmatched_cases = Vec::new();
        for &case_row in &case_rows {
            match assignment.control_for(case_row) {
                Some(control_row) => pairs.push(MatchedPair {
                    case_id: table.row_id(case_row).to_string(),
                    control_id: table.row_id(control_row).to_string(),
                }),
                None => unmatched_cases.push(table.row_id(case_row).to_string()),
            }
        }

        let elapsed = start_time.elapsed();
        info!(
            "Matching complete: {} of {} cases matched in {:.2?}",
            pairs.len(),
            case_rows.len(),
            elapsed
        );

        Ok(MatchingResult {
            pairs,
            case_count: case_rows.len(),
            control_count: control_rows.len(),
            unmatched_cases,
            matching_time: elapsed,
        })
    }
}

/// Append the `matched_to` column: each matched sample points at its
/// partner's id, every other sample gets the unmatched sentinel.
pub fn apply_matches(table: &mut MetadataTable, result: &MatchingResult) -> Result<()> {
    let mut matched_to = vec![UNMATCHED.to_string(); table.len()];
    for pair in &result.pairs {
        let case_row = table.row_index(&pair.case_id).ok_or_else(|| {
            MatchError::LookupFault(format!("matched case '{}' missing from table", pair.case_id))
        })?;
        let control_row = table.row_index(&pair.control_id).ok_or_else(|| {
            MatchError::LookupFault(format!(
                "matched control '{}' missing from table",
                pair.control_id
            ))
        })?;
        matched_to[case_row] = pair.control_id.clone();
        matched_to[control_row] = pair.case_id.clone();
    }
    table.add_column(MATCHED_TO_COLUMN, matched_to)
}
