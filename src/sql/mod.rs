//! SQL DDL to entity-relationship model conversion.
//!
//! Input is parsed with the first accepting dialect, then three passes run
//! over the resulting statements: `CREATE TABLE` extraction, `ALTER TABLE`
//! foreign-key reconciliation, and a naming-convention fallback used when no
//! foreign key was declared anywhere.

mod dialect;
mod extract;
pub mod ident;
mod infer;
mod parser;
mod reconcile;
mod relationships;
pub mod statement;
pub mod types;

pub use dialect::Dialect;
pub use extract::UNKNOWN_TABLE;
pub use infer::DEFAULT_TARGET_COLUMN;
pub use parser::{parse_sql, parse_sql_with, parse_statements, ParseOptions, SqlParseError};
