//! Foreign-key inference from `<name>_id` column naming.
//!
//! Runs only when the DDL declared no foreign key anywhere.

use crate::model::{Column, Relationship, Table};

use super::ident::same_ident;
use super::relationships::RelationshipSet;

/// Target column assumed when the referenced table has no primary key.
pub const DEFAULT_TARGET_COLUMN: &str = "id";

/// Infer relationships from column names.
///
/// Does nothing unless `rels` is empty and there are at least two tables.
pub(crate) fn infer_relationships(tables: &mut [Table], rels: &mut RelationshipSet) {
    if !rels.is_empty() || tables.len() < 2 {
        return;
    }

    let mut inferred = Vec::new();
    for (table_idx, table) in tables.iter().enumerate() {
        for (column_idx, column) in table.columns.iter().enumerate() {
            if let Some(rel) = infer_link(tables, table, column) {
                inferred.push((table_idx, column_idx, rel));
            }
        }
    }

    for (table_idx, column_idx, rel) in inferred {
        if rels.contains(&rel.id) {
            continue;
        }
        tables[table_idx].columns[column_idx].link(rel.target(), true);
        rels.insert(rel);
    }

    tracing::debug!(inferred = rels.len(), "inferred relationships from column names");
}

fn infer_link(tables: &[Table], table: &Table, column: &Column) -> Option<Relationship> {
    if column.is_primary_key {
        return None;
    }
    let base = id_base(&column.name)?;

    let others = move || tables.iter().filter(move |t| !same_ident(&t.name, &table.name));
    let target = candidates(&base)
        .iter()
        .find_map(|candidate| others().find(|t| t.name.to_lowercase() == *candidate))
        .or_else(|| others().find(|t| singular_forms(&t.name.to_lowercase()).contains(&base)))?;

    let target_column = target
        .primary_key()
        .map(|c| c.name.as_str())
        .unwrap_or(DEFAULT_TARGET_COLUMN);

    Some(Relationship::new(
        &table.name,
        &column.name,
        &target.name,
        target_column,
    ))
}

/// `user_id` -> `user`. Matching is on the lowercased name.
fn id_base(column: &str) -> Option<String> {
    let lower = column.to_lowercase();
    lower
        .strip_suffix("_id")
        .filter(|base| !base.is_empty())
        .map(str::to_string)
}

/// Table names a base could refer to, in priority order.
fn candidates(base: &str) -> [String; 4] {
    [
        base.to_string(),
        format!("{base}s"),
        format!("{base}es"),
        ies_to_y(base),
    ]
}

/// Ways to read a table name as a singular noun.
fn singular_forms(name: &str) -> [String; 4] {
    [
        name.to_string(),
        name.strip_suffix('s').unwrap_or(name).to_string(),
        name.strip_suffix("es").unwrap_or(name).to_string(),
        ies_to_y(name),
    ]
}

fn ies_to_y(word: &str) -> String {
    match word.strip_suffix("ies") {
        Some(stem) => format!("{stem}y"),
        None => word.to_string(),
    }
}
