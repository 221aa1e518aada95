//! A Rust library for one-to-one case-control sample matching on tabular
//! study metadata, with expression-based cohort selection and configurable
//! matching conditions.

pub mod algorithm;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use error::{MatchError, Result};
pub use metadata::{MetadataTable, load_metadata, save_metadata};

// Cohort selection
pub use algorithm::cohort::{CohortConfig, Role, build_cohort};

// Matching engine
pub use algorithm::matching::{
    CompatibilityEvaluator, MatchCondition, MatchMode, MatchedPair, Matcher, MatchingConfig,
    MatchingResult, apply_matches, parse_condition_lines,
};

// Filtering capabilities
pub use filter::{Expr, LiteralValue, parse_predicate, parse_query_lines};
