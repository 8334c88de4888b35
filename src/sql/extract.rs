//! Table and column extraction from `CREATE TABLE` statements.

use crate::model::{Column, ColumnRef, Relationship, Table};

use super::ident::same_ident;
use super::relationships::RelationshipSet;
use super::statement::{ColumnSpec, ConstraintSpec, CreateTable, ForeignKeySpec, Statement};

/// Name given to a table whose identifier could not be recovered.
pub const UNKNOWN_TABLE: &str = "unknown";

/// Build one table per `CREATE TABLE`, recording every foreign key declared
/// at creation time.
///
/// A redeclared table replaces the earlier definition in place, together
/// with the relationships that definition contributed.
pub(crate) fn extract_tables(statements: &[Statement], rels: &mut RelationshipSet) -> Vec<Table> {
    let mut tables: Vec<Table> = Vec::new();

    for stmt in statements {
        let Statement::CreateTable(create) = stmt else {
            continue;
        };

        let name = table_name(create);
        let existing = tables.iter().position(|t| same_ident(&t.name, &name));
        if let Some(idx) = existing {
            tracing::debug!(table = %name, "table redeclared, keeping the last definition");
            rels.remove_source_table(&tables[idx].name);
        }

        let table = build_table(name, create, rels);
        match existing {
            Some(idx) => tables[idx] = table,
            None => tables.push(table),
        }
    }

    tracing::debug!(
        tables = tables.len(),
        relationships = rels.len(),
        "extracted CREATE TABLE statements"
    );
    tables
}

/// Table-level keys gathered before columns are built.
#[derive(Default)]
struct TableKeys<'a> {
    primary: Vec<&'a str>,
    references: Vec<(&'a str, ColumnRef)>,
}

impl TableKeys<'_> {
    fn is_primary(&self, column: &str) -> bool {
        self.primary.iter().any(|pk| same_ident(pk, column))
    }

    /// Last constraint-level reference declared for `column`.
    fn reference(&self, column: &str) -> Option<&ColumnRef> {
        self.references
            .iter()
            .rev()
            .find(|(src, _)| same_ident(src, column))
            .map(|(_, target)| target)
    }
}

fn table_name(create: &CreateTable) -> String {
    create
        .name
        .clone()
        .unwrap_or_else(|| UNKNOWN_TABLE.to_string())
}

fn build_table(name: String, create: &CreateTable, rels: &mut RelationshipSet) -> Table {
    // Constraints first: the column pass needs the primary-key set.
    let mut keys = TableKeys::default();
    for constraint in &create.constraints {
        match constraint {
            ConstraintSpec::PrimaryKey(cols) => {
                keys.primary.extend(cols.iter().map(String::as_str));
            }
            ConstraintSpec::ForeignKey(fk) => {
                for (source, rel) in declared_links(&name, fk) {
                    keys.references.push((source, rel.target()));
                    rels.insert(rel);
                }
            }
            ConstraintSpec::Other => {}
        }
    }

    let columns = create
        .columns
        .iter()
        .map(|spec| build_column(&name, spec, &keys, rels))
        .collect();

    Table::new(name, columns)
}

fn build_column(
    table: &str,
    spec: &ColumnSpec,
    keys: &TableKeys<'_>,
    rels: &mut RelationshipSet,
) -> Column {
    let mut column = Column::new(&spec.name, &spec.typ);
    column.default_value = spec.default.clone();
    column.is_unique = spec.unique;
    column.is_not_null = spec.not_null;

    if spec.primary_key || spec.auto_increment || keys.is_primary(&spec.name) {
        column = column.primary_key();
    }

    let inline = spec
        .references
        .as_ref()
        .and_then(|fk| declared_links(table, fk).into_iter().next());

    // An inline reference wins over a table-level one for the same column.
    column.references = match inline {
        Some((_, rel)) => {
            let target = rel.target();
            rels.insert(rel);
            Some(target)
        }
        None => keys.reference(&spec.name).cloned(),
    };

    column.is_foreign_key = column.references.is_some() || rels.has_source(table, &spec.name);
    column
}

/// One relationship per positional column pair of a declared foreign key.
///
/// Yields nothing when the target table is missing.
fn declared_links<'a>(table: &str, fk: &'a ForeignKeySpec) -> Vec<(&'a str, Relationship)> {
    let Some(target_table) = fk.target_table.as_deref() else {
        return Vec::new();
    };
    fk.pairs()
        .map(|(source, target)| (source, Relationship::new(table, source, target_table, target)))
        .collect()
}
