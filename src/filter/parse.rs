//! Line-oriented parser for query predicates.
//!
//! Each line holds one predicate of the form `<column> <op> <value>` with
//! `op` one of `=`, `==`, `!=`, `<`, `<=`, `>`, `>=`. Values may be quoted
//! with single or double quotes; bare numeric values parse as numbers.
//! Lines combine conjunctively.

use crate::error::{MatchError, Result};
use crate::filter::expr::{Expr, LiteralValue};

/// Parse a single predicate line
pub fn parse_predicate(line: &str) -> Result<Expr> {
    let mut parts = line.split_whitespace();
    let (Some(column), Some(op)) = (parts.next(), parts.next()) else {
        return Err(malformed(line));
    };
    let value = parts.collect::<Vec<_>>().join(" ");
    if value.is_empty() {
        return Err(malformed(line));
    }

    let column = column.to_string();
    let literal = parse_literal(&value);
    match op {
        "=" | "==" => Ok(Expr::Eq(column, literal)),
        "!=" => Ok(Expr::NotEq(column, literal)),
        "<" => Ok(Expr::Lt(column, literal)),
        "<=" => Ok(Expr::LtEq(column, literal)),
        ">" => Ok(Expr::Gt(column, literal)),
        ">=" => Ok(Expr::GtEq(column, literal)),
        other => Err(MatchError::InvalidQuery(format!(
            "unknown operator '{other}' in '{line}'"
        ))),
    }
}

/// Parse query lines into a single conjunctive expression.
///
/// Blank lines are ignored; no lines at all yields an expression that
/// accepts every row.
pub fn parse_query_lines<I, S>(lines: I) -> Result<Expr>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut predicates = Vec::new();
    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        predicates.push(parse_predicate(line)?);
    }

    Ok(match predicates.len() {
        0 => Expr::AlwaysTrue,
        1 => predicates.remove(0),
        _ => Expr::And(predicates),
    })
}

fn parse_literal(raw: &str) -> LiteralValue {
    let trimmed = raw.trim();
    if trimmed.len() >= 2 {
        let bytes = trimmed.as_bytes();
        let first = bytes[0];
        let last = bytes[trimmed.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return LiteralValue::String(trimmed[1..trimmed.len() - 1].to_string());
        }
    }
    match trimmed.parse::<f64>() {
        Ok(number) => LiteralValue::Number(number),
        Err(_) => LiteralValue::String(trimmed.to_string()),
    }
}

fn malformed(line: &str) -> MatchError {
    MatchError::InvalidQuery(format!("expected '<column> <op> <value>', got '{line}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_operators_and_literals() {
        assert_eq!(
            parse_predicate("sex = F").unwrap(),
            Expr::Eq("sex".into(), LiteralValue::String("F".into()))
        );
        assert_eq!(
            parse_predicate("age >= 18").unwrap(),
            Expr::GtEq("age".into(), LiteralValue::Number(18.0))
        );
        assert_eq!(
            parse_predicate("site != 'Site A'").unwrap(),
            Expr::NotEq("site".into(), LiteralValue::String("Site A".into()))
        );
    }

    #[test]
    fn quoted_numbers_stay_strings() {
        assert_eq!(
            parse_predicate("code = \"42\"").unwrap(),
            Expr::Eq("code".into(), LiteralValue::String("42".into()))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(parse_predicate("age").is_err());
        assert!(parse_predicate("age ~ 12").is_err());
        assert!(parse_predicate("age =").is_err());
    }

    #[test]
    fn lines_combine_conjunctively() {
        let expr = parse_query_lines(["sex = F", "", "age >= 18"]).unwrap();
        assert_eq!(
            expr,
            Expr::And(vec![
                Expr::Eq("sex".into(), LiteralValue::String("F".into())),
                Expr::GtEq("age".into(), LiteralValue::Number(18.0)),
            ])
        );
        assert_eq!(parse_query_lines::<_, &str>([]).unwrap(), Expr::AlwaysTrue);
    }
}
