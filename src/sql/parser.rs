//! SQL DDL to schema model.

use sqlparser::parser::Parser;
use thiserror::Error;

use super::dialect::Dialect;
use super::extract::extract_tables;
use super::infer::infer_relationships;
use super::reconcile::reconcile_alters;
use super::relationships::RelationshipSet;
use super::statement::Statement;
use crate::model::Schema;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlParseError {
    #[error("SQL input is empty")]
    EmptyInput,
    #[error("Failed to parse SQL. Please check your syntax.")]
    UnparseableSql,
}

/// Parser configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Dialects tried in order; the first that accepts the input wins.
    pub dialects: Vec<Dialect>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            dialects: Dialect::FALLBACK_ORDER.to_vec(),
        }
    }
}

impl ParseOptions {
    /// Parse with a single dialect and no fallback.
    pub fn dialect(dialect: Dialect) -> Self {
        Self {
            dialects: vec![dialect],
        }
    }

    fn chain(&self) -> &[Dialect] {
        if self.dialects.is_empty() {
            &Dialect::FALLBACK_ORDER
        } else {
            &self.dialects
        }
    }
}

/// Parse SQL DDL into a schema, trying MySQL, PostgreSQL and T-SQL in turn.
pub fn parse_sql(input: &str) -> Result<Schema, SqlParseError> {
    parse_sql_with(input, &ParseOptions::default())
}

/// Parse SQL DDL into a schema using the given options.
pub fn parse_sql_with(input: &str, options: &ParseOptions) -> Result<Schema, SqlParseError> {
    let statements = parse_statements(input, options)?;

    let mut rels = RelationshipSet::default();
    let mut tables = extract_tables(&statements, &mut rels);
    reconcile_alters(&statements, &mut tables, &mut rels);
    infer_relationships(&mut tables, &mut rels);

    Ok(Schema {
        tables,
        relationships: rels.into_vec(),
    })
}

/// Parse with the first dialect that accepts the whole input.
///
/// Individual dialect errors are only logged; callers see
/// [`SqlParseError::UnparseableSql`] once every dialect has failed.
///
/// One statement no grammar accepts fails the whole script. A common case is
/// the SSMS export form `ALTER TABLE t WITH CHECK ADD CONSTRAINT ...`.
pub fn parse_statements(
    input: &str,
    options: &ParseOptions,
) -> Result<Vec<Statement>, SqlParseError> {
    if input.trim().is_empty() {
        return Err(SqlParseError::EmptyInput);
    }

    for &dialect in options.chain() {
        match Parser::parse_sql(&*dialect.grammar(), input) {
            Ok(parsed) => {
                tracing::debug!(%dialect, statements = parsed.len(), "parsed SQL");
                return Ok(parsed.iter().map(Statement::from).collect());
            }
            Err(err) => tracing::debug!(%dialect, error = %err, "dialect rejected SQL"),
        }
    }

    Err(SqlParseError::UnparseableSql)
}
