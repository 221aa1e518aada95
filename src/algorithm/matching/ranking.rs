//! Scarcity ranking and case ordering
//!
//! Preference lists are sorted ascending by how many cases want each
//! control; the matcher pops from the back, so the most contested control
//! is proposed to first and rarely-wanted controls are held in reserve.
//! The free-case stack is sorted descending by option count and likewise
//! popped from the back, so the case with the fewest compatible controls
//! proposes first.

use rustc_hash::FxHashMap;

use crate::algorithm::matching::types::{CompatibilityMap, ScarcityCounts};

/// Count control usage across cases and each case's starting option count
#[must_use]
pub fn count_scarcity(map: &CompatibilityMap) -> ScarcityCounts {
    let mut control_uses: FxHashMap<usize, usize> = FxHashMap::default();
    let mut case_options: FxHashMap<usize, usize> = FxHashMap::default();

    for (case, controls) in map.cases.iter().zip(&map.controls) {
        case_options.insert(*case, controls.len());
        for control in controls {
            *control_uses.entry(*control).or_insert(0) += 1;
        }
    }

    ScarcityCounts {
        control_uses,
        case_options,
    }
}

/// Reorder every preference list ascending by control usage.
///
/// The sort is stable: controls wanted by the same number of cases keep
/// their pool order. The input map is not touched.
#[must_use]
pub fn rank_preferences(map: &CompatibilityMap, counts: &ScarcityCounts) -> CompatibilityMap {
    let mut ranked = map.clone();
    for controls in &mut ranked.controls {
        controls.sort_by_key(|control| counts.control_uses.get(control).copied().unwrap_or(0));
    }
    ranked
}

/// Order case rows descending by option count, ties in input order.
///
/// The result is consumed as a stack: the last entry, the case with the
/// fewest compatible controls, is popped first.
#[must_use]
pub fn order_cases(map: &CompatibilityMap) -> Vec<usize> {
    let mut entries: Vec<(usize, usize)> = map
        .cases
        .iter()
        .zip(&map.controls)
        .map(|(case, controls)| (*case, controls.len()))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1));
    entries.into_iter().map(|(case, _)| case).collect()
}
