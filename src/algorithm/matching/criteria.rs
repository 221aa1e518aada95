//! Match condition definitions and run configuration
//!
//! Conditions arrive in a tab-separated file format: each line is
//! `<mode>\t<column>\t<argument>` where mode is `exact` (argument ignored,
//! conventionally `=`) or `range` (argument is the numeric tolerance).
//! The condition list is conjunctive and ordered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

/// How a single column is compared between a case and a candidate control
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "mode")]
pub enum MatchMode {
    /// Values must be identical strings
    Exact,
    /// Values parse as numbers within `tolerance` of each other, bounds inclusive
    Range {
        /// Maximum allowed absolute difference
        tolerance: f64,
    },
}

/// A single matching condition on one covariate column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCondition {
    /// Covariate column the condition applies to
    pub column: String,
    /// Comparison mode
    #[serde(flatten)]
    pub mode: MatchMode,
}

impl MatchCondition {
    /// Exact-match condition on a column
    pub fn exact(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            mode: MatchMode::Exact,
        }
    }

    /// Range condition with the given inclusive tolerance
    pub fn range(column: impl Into<String>, tolerance: f64) -> Self {
        Self {
            column: column.into(),
            mode: MatchMode::Range { tolerance },
        }
    }

    /// Parse one condition line in the tab-separated input format
    pub fn parse_line(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 2 || fields[1].is_empty() {
            return Err(MatchError::InvalidCondition(format!(
                "expected '<mode><TAB><column><TAB><argument>', got '{line}'"
            )));
        }

        let column = fields[1].to_string();
        match fields[0] {
            "exact" => Ok(Self {
                column,
                mode: MatchMode::Exact,
            }),
            "range" => {
                let raw = fields.get(2).copied().unwrap_or("");
                let tolerance = raw.parse::<f64>().map_err(|_| MatchError::InvalidNumber {
                    column: column.clone(),
                    value: raw.to_string(),
                })?;
                Ok(Self {
                    column,
                    mode: MatchMode::Range { tolerance },
                })
            }
            other => Err(MatchError::InvalidCondition(format!(
                "unknown match mode '{other}' in '{line}'"
            ))),
        }
    }
}

impl fmt::Display for MatchCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            MatchMode::Exact => write!(f, "exact({})", self.column),
            MatchMode::Range { tolerance } => write!(f, "range({} ± {tolerance})", self.column),
        }
    }
}

/// Parse a whole condition file: one condition per line, blank lines ignored
pub fn parse_condition_lines(text: &str) -> Result<Vec<MatchCondition>> {
    let mut conditions = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            continue;
        }
        conditions.push(MatchCondition::parse_line(line)?);
    }
    Ok(conditions)
}

/// Configuration for the matching process
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    /// Ordered, conjunctive match conditions
    pub conditions: Vec<MatchCondition>,
    /// Whether to shard compatibility evaluation across threads
    pub use_parallel: bool,
    /// Whether to display a progress bar during compatibility evaluation
    pub show_progress: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            conditions: Vec::new(),
            use_parallel: true,
            show_progress: true,
        }
    }
}

impl MatchingConfig {
    /// Create a new builder for constructing matching configuration
    #[must_use]
    pub fn builder() -> MatchingConfigBuilder {
        MatchingConfigBuilder::new()
    }
}

/// Builder for constructing matching configuration
#[derive(Debug, Clone)]
pub struct MatchingConfigBuilder {
    config: MatchingConfig,
}

impl Default for MatchingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingConfigBuilder {
    /// Create a new builder with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    /// Set the full condition list
    #[must_use]
    pub fn conditions(mut self, conditions: Vec<MatchCondition>) -> Self {
        self.config.conditions = conditions;
        self
    }

    /// Append a single condition
    #[must_use]
    pub fn condition(mut self, condition: MatchCondition) -> Self {
        self.config.conditions.push(condition);
        self
    }

    /// Set whether to shard compatibility evaluation across threads
    #[must_use]
    pub const fn use_parallel(mut self, parallel: bool) -> Self {
        self.config.use_parallel = parallel;
        self
    }

    /// Set whether to display progress bars
    #[must_use]
    pub const fn show_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    /// Build the matching configuration
    #[must_use]
    pub fn build(self) -> MatchingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_and_range_lines() {
        let conditions = parse_condition_lines("exact\tsex\t=\nrange\tage\t5\n").unwrap();
        assert_eq!(
            conditions,
            vec![
                MatchCondition::exact("sex"),
                MatchCondition::range("age", 5.0)
            ]
        );
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(matches!(
            MatchCondition::parse_line("fuzzy\tsex\t="),
            Err(MatchError::InvalidCondition(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_tolerance() {
        assert!(matches!(
            MatchCondition::parse_line("range\tage\tfive"),
            Err(MatchError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn rejects_missing_column() {
        assert!(MatchCondition::parse_line("exact").is_err());
        assert!(MatchCondition::parse_line("range\t\t5").is_err());
    }
}
