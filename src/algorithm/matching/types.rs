//! Type definitions for the matching engine
//!
//! This module contains common types used throughout the matching algorithm.

use std::time::Duration;

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};

/// Sentinel written to `matched_to` for samples without a partner
pub const UNMATCHED: &str = "0";

/// Name of the column recording each sample's match partner
pub const MATCHED_TO_COLUMN: &str = "matched_to";

/// Per-case compatible-control sets
///
/// Entries are indices into the metadata table the map was built from;
/// cases appear in input order, and each control list preserves pool order
/// until ranked.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityMap {
    /// Case row indices, in input order
    pub cases: Vec<usize>,
    /// For each case, the compatible control row indices
    pub controls: Vec<Vec<usize>>,
}

impl CompatibilityMap {
    /// Number of cases in the map
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Whether the map holds no cases
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

/// Scarcity counts used for preference ranking and displacement tie-breaks
///
/// Computed once per run from the raw compatibility map and never updated
/// while matching.
#[derive(Debug, Clone, Default)]
pub struct ScarcityCounts {
    /// Control row -> number of cases it is compatible with
    pub control_uses: FxHashMap<usize, usize>,
    /// Case row -> number of compatible controls it started with
    pub case_options: FxHashMap<usize, usize>,
}

/// One-to-one control/case assignment, injective in both directions
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    control_to_case: FxHashMap<usize, usize>,
    case_to_control: FxHashMap<usize, usize>,
}

impl Assignment {
    /// Case currently holding a control, if any
    #[must_use]
    pub fn case_for(&self, control: usize) -> Option<usize> {
        self.control_to_case.get(&control).copied()
    }

    /// Control assigned to a case, if any
    #[must_use]
    pub fn control_for(&self, case: usize) -> Option<usize> {
        self.case_to_control.get(&case).copied()
    }

    /// Assign a control to a case, releasing the control's previous holder
    pub fn assign(&mut self, control: usize, case: usize) {
        if let Some(previous) = self.control_to_case.insert(control, case) {
            self.case_to_control.remove(&previous);
        }
        self.case_to_control.insert(case, control);
    }

    /// Number of matched pairs
    #[must_use]
    pub fn len(&self) -> usize {
        self.control_to_case.len()
    }

    /// Whether no pair was formed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.control_to_case.is_empty()
    }
}

/// Pair of matched case and control samples
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    /// Case sample id
    pub case_id: String,
    /// Control sample id
    pub control_id: String,
}

/// Result of a matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchingResult {
    /// Matched pairs, in case input order
    pub pairs: Vec<MatchedPair>,
    /// Number of cases in the cohort
    pub case_count: usize,
    /// Number of controls in the pool
    pub control_count: usize,
    /// Case ids left without a partner
    pub unmatched_cases: Vec<String>,
    /// Time taken for matching
    #[serde(rename = "matching_seconds", serialize_with = "duration_secs")]
    pub matching_time: Duration,
}

fn duration_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
