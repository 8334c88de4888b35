//! Dialect-independent view of the DDL statements this crate understands.
//!
//! Parsed `sqlparser` statements are converted here right after the dialect
//! fallback, so extraction never touches grammar-specific shapes.

use sqlparser::ast::{self, AlterTableOperation, ColumnDef, ColumnOption, Ident, TableConstraint};

use super::ident::{clean_identifier, from_ident, from_object_name};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    CreateTable(CreateTable),
    AlterTable(AlterTable),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTable {
    /// Cleaned table name; `None` when the statement carried no usable name.
    pub name: Option<String>,
    pub columns: Vec<ColumnSpec>,
    pub constraints: Vec<ConstraintSpec>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSpec {
    pub name: String,
    /// Declared type, parameters kept (`VARCHAR(255)`).
    pub typ: String,
    pub not_null: bool,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub default: Option<String>,
    /// Inline `REFERENCES` clause.
    pub references: Option<ForeignKeySpec>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintSpec {
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKeySpec),
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForeignKeySpec {
    pub columns: Vec<String>,
    pub target_table: Option<String>,
    pub target_columns: Vec<String>,
}

impl ForeignKeySpec {
    /// Source/target column pairs, matched by position.
    ///
    /// Pairing stops at the shorter of the two lists. Pairs with a blank
    /// side are dropped without shifting the others.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns
            .iter()
            .zip(&self.target_columns)
            .filter(|(src, dst)| !src.is_empty() && !dst.is_empty())
            .map(|(src, dst)| (src.as_str(), dst.as_str()))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlterTable {
    pub name: Option<String>,
    /// Constraints introduced by `ADD` actions, in statement order.
    pub added: Vec<ConstraintSpec>,
}

impl From<&ast::Statement> for Statement {
    fn from(stmt: &ast::Statement) -> Self {
        match stmt {
            ast::Statement::CreateTable(create) => Statement::CreateTable(CreateTable {
                name: from_object_name(&create.name),
                columns: create.columns.iter().filter_map(column_spec).collect(),
                constraints: create.constraints.iter().map(constraint_spec).collect(),
            }),
            ast::Statement::AlterTable {
                name, operations, ..
            } => Statement::AlterTable(AlterTable {
                name: from_object_name(name),
                added: operations
                    .iter()
                    .filter_map(|op| match op {
                        AlterTableOperation::AddConstraint(constraint) => {
                            Some(constraint_spec(constraint))
                        }
                        _ => None,
                    })
                    .collect(),
            }),
            _ => Statement::Other,
        }
    }
}

fn column_spec(def: &ColumnDef) -> Option<ColumnSpec> {
    let name = from_ident(&def.name)?;
    let mut spec = ColumnSpec {
        typ: def.data_type.to_string(),
        ..Default::default()
    };

    for option in &def.options {
        match &option.option {
            ColumnOption::NotNull => spec.not_null = true,
            ColumnOption::Null => {}
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    spec.primary_key = true;
                } else {
                    spec.unique = true;
                }
            }
            ColumnOption::Default(expr) => spec.default = Some(expr.to_string()),
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                ..
            } => {
                spec.references = Some(ForeignKeySpec {
                    columns: vec![name.clone()],
                    target_table: from_object_name(foreign_table),
                    target_columns: ident_list(referred_columns),
                });
            }
            other => {
                if is_auto_increment(other) {
                    spec.auto_increment = true;
                }
            }
        }
    }

    spec.name = name;
    Some(spec)
}

/// `AUTO_INCREMENT` (MySQL), `AUTOINCREMENT` (SQLite) or `IDENTITY` (T-SQL).
fn is_auto_increment(option: &ColumnOption) -> bool {
    let text = option.to_string().to_uppercase();
    text.starts_with("AUTO_INCREMENT")
        || text.starts_with("AUTOINCREMENT")
        || text.starts_with("IDENTITY")
}

fn constraint_spec(constraint: &TableConstraint) -> ConstraintSpec {
    match constraint {
        TableConstraint::PrimaryKey { columns, .. } => {
            ConstraintSpec::PrimaryKey(ident_list(columns))
        }
        TableConstraint::ForeignKey {
            columns,
            foreign_table,
            referred_columns,
            ..
        } => ConstraintSpec::ForeignKey(ForeignKeySpec {
            columns: ident_list(columns),
            target_table: from_object_name(foreign_table),
            target_columns: ident_list(referred_columns),
        }),
        _ => ConstraintSpec::Other,
    }
}

/// Cleaned names, blanks kept so positions line up.
fn ident_list(idents: &[Ident]) -> Vec<String> {
    idents.iter().map(|i| clean_identifier(&i.value)).collect()
}
