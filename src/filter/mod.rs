//! Expression-based filtering for metadata tables.

pub mod expr;
pub mod parse;

pub use expr::{Expr, LiteralValue};
pub use parse::{parse_predicate, parse_query_lines};
