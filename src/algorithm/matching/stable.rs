//! Stable-marriage assignment loop
//!
//! Free cases are popped from the stack; each pop proposes to the case's
//! most-preferred remaining control. An occupied control changes hands only
//! if the proposer started with strictly fewer options than the incumbent
//! (ties favor the incumbent). The scarcity snapshot is fixed before the
//! loop and never recomputed. Every failed proposal consumes one preference
//! entry, so the loop terminates after at most the summed length of all
//! preference lists.

use rustc_hash::FxHashMap;

use crate::algorithm::matching::types::{Assignment, CompatibilityMap, ScarcityCounts};
use crate::error::{MatchError, Result};

/// Run the matching loop over ranked preference lists.
///
/// `free` is consumed as a stack. The ranked lists are copied into a
/// privately owned working map and consumed destructively; a case whose
/// list empties stays permanently unmatched.
pub fn stable_marriage(
    mut free: Vec<usize>,
    ranked: &CompatibilityMap,
    counts: &ScarcityCounts,
) -> Result<Assignment> {
    let mut preferences: FxHashMap<usize, Vec<usize>> = ranked
        .cases
        .iter()
        .copied()
        .zip(ranked.controls.iter().cloned())
        .collect();

    let mut assignment = Assignment::default();

    while let Some(case) = free.pop() {
        let remaining = preferences.get_mut(&case).ok_or_else(|| {
            MatchError::LookupFault(format!("case row {case} missing from preference map"))
        })?;

        // Exhausted list: the case stays permanently unmatched
        let Some(control) = remaining.pop() else {
            continue;
        };

        match assignment.case_for(control) {
            None => assignment.assign(control, case),
            Some(incumbent) => {
                let proposer_options = case_options(counts, case)?;
                let incumbent_options = case_options(counts, incumbent)?;
                if proposer_options < incumbent_options {
                    // The harder-to-match case displaces the incumbent,
                    // which goes back on the stack with its remaining list
                    assignment.assign(control, case);
                    free.push(incumbent);
                } else {
                    free.push(case);
                }
            }
        }
    }

    Ok(assignment)
}

fn case_options(counts: &ScarcityCounts, case: usize) -> Result<usize> {
    counts.case_options.get(&case).copied().ok_or_else(|| {
        MatchError::LookupFault(format!("case row {case} missing from scarcity counts"))
    })
}
