//! Case-control matching engine
//!
//! This module implements the algorithm for assigning each case sample a
//! unique control sample. It includes:
//!
//! 1. Match condition definition and parsing
//! 2. Compatibility evaluation under ordered, conjunctive conditions
//! 3. Scarcity-based preference ranking and case ordering
//! 4. A stable-marriage assignment loop with a static scarcity tie-break
//!
//! The result is a deterministic one-to-one case/control assignment that is
//! written back onto the metadata table as a `matched_to` column.

pub mod compatibility;
pub mod criteria;
pub mod matcher;
pub mod ranking;
pub mod stable;
pub mod types;
pub mod validation;

// Re-export key types
pub use compatibility::CompatibilityEvaluator;
pub use criteria::{
    MatchCondition, MatchMode, MatchingConfig, MatchingConfigBuilder, parse_condition_lines,
};
pub use matcher::{Matcher, apply_matches};
pub use types::{
    Assignment, CompatibilityMap, MATCHED_TO_COLUMN, MatchedPair, MatchingResult, ScarcityCounts,
    UNMATCHED,
};
