//! Filter expressions evaluated row-wise against a metadata table.
//!
//! Comparison semantics: against a `Number` literal, equality treats a
//! non-numeric cell as not-equal and ordering treats it as not-satisfying;
//! against a `String` literal, equality is exact string comparison and
//! ordering is lexicographic.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::error::Result;
use crate::metadata::MetadataTable;

/// Represents a filter expression for querying sample metadata
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Column equals a literal value
    Eq(String, LiteralValue),

    /// Column not equals a literal value
    NotEq(String, LiteralValue),

    /// Column is greater than a literal value
    Gt(String, LiteralValue),

    /// Column is greater than or equal to a literal value
    GtEq(String, LiteralValue),

    /// Column is less than a literal value
    Lt(String, LiteralValue),

    /// Column is less than or equal to a literal value
    LtEq(String, LiteralValue),

    /// Column is in a set of values
    In(String, Vec<LiteralValue>),

    /// Column is not in a set of values
    NotIn(String, Vec<LiteralValue>),

    /// Logical AND of expressions
    And(Vec<Expr>),

    /// Logical OR of expressions
    Or(Vec<Expr>),

    /// Logical NOT of an expression
    Not(Box<Expr>),

    /// Always evaluates to true
    AlwaysTrue,
}

/// Represents a literal value that can be used in filter expressions
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    /// Numeric value
    Number(f64),

    /// String value
    String(String),
}

impl LiteralValue {
    /// Equality against a raw cell
    #[must_use]
    fn equals(&self, cell: &str) -> bool {
        match self {
            Self::Number(number) => cell
                .trim()
                .parse::<f64>()
                .is_ok_and(|value| value == *number),
            Self::String(text) => cell == text,
        }
    }

    /// Ordering of a raw cell relative to this literal
    #[must_use]
    fn compare(&self, cell: &str) -> Option<Ordering> {
        match self {
            Self::Number(number) => cell
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(|value| value.partial_cmp(number)),
            Self::String(text) => Some(cell.cmp(text.as_str())),
        }
    }
}

impl Expr {
    /// Returns a set of all column names required by this expression
    #[must_use]
    pub fn required_columns(&self) -> HashSet<String> {
        let mut columns = HashSet::new();
        self.collect_required_columns(&mut columns);
        columns
    }

    /// Helper method to collect column names
    fn collect_required_columns(&self, columns: &mut HashSet<String>) {
        match self {
            Self::Eq(col, _)
            | Self::NotEq(col, _)
            | Self::Gt(col, _)
            | Self::GtEq(col, _)
            | Self::Lt(col, _)
            | Self::LtEq(col, _)
            | Self::In(col, _)
            | Self::NotIn(col, _) => {
                columns.insert(col.clone());
            }
            Self::And(exprs) | Self::Or(exprs) => {
                for expr in exprs {
                    expr.collect_required_columns(columns);
                }
            }
            Self::Not(expr) => expr.collect_required_columns(columns),
            Self::AlwaysTrue => {}
        }
    }

    /// Evaluate this expression against a single row
    pub fn matches(&self, table: &MetadataTable, row: usize) -> Result<bool> {
        match self {
            Self::Eq(col, literal) => Ok(literal.equals(table.value(row, col)?)),
            Self::NotEq(col, literal) => Ok(!literal.equals(table.value(row, col)?)),
            Self::Gt(col, literal) => Ok(matches!(
                literal.compare(table.value(row, col)?),
                Some(Ordering::Greater)
            )),
            Self::GtEq(col, literal) => Ok(matches!(
                literal.compare(table.value(row, col)?),
                Some(Ordering::Greater | Ordering::Equal)
            )),
            Self::Lt(col, literal) => Ok(matches!(
                literal.compare(table.value(row, col)?),
                Some(Ordering::Less)
            )),
            Self::LtEq(col, literal) => Ok(matches!(
                literal.compare(table.value(row, col)?),
                Some(Ordering::Less | Ordering::Equal)
            )),
            Self::In(col, literals) => {
                let cell = table.value(row, col)?;
                Ok(literals.iter().any(|literal| literal.equals(cell)))
            }
            Self::NotIn(col, literals) => {
                let cell = table.value(row, col)?;
                Ok(!literals.iter().any(|literal| literal.equals(cell)))
            }
            Self::And(exprs) => {
                for expr in exprs {
                    if !expr.matches(table, row)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(exprs) => {
                for expr in exprs {
                    if expr.matches(table, row)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Self::Not(expr) => Ok(!expr.matches(table, row)?),
            Self::AlwaysTrue => Ok(true),
        }
    }

    /// Evaluate this expression into a row mask over the whole table
    pub fn mask(&self, table: &MetadataTable) -> Result<Vec<bool>> {
        (0..table.len()).map(|row| self.matches(table, row)).collect()
    }
}
