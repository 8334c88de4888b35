//! Attribution of `ALTER TABLE ... ADD FOREIGN KEY` onto extracted tables.

use crate::model::{Relationship, Table};

use super::ident::same_ident;
use super::relationships::RelationshipSet;
use super::statement::{ConstraintSpec, Statement};

/// A foreign key resolved against known tables.
struct Link {
    table: usize,
    column: usize,
    rel: Relationship,
}

/// Apply every foreign key added by an `ALTER TABLE` statement.
///
/// Clauses naming a table or column that was never created are dropped.
pub(crate) fn reconcile_alters(
    statements: &[Statement],
    tables: &mut [Table],
    rels: &mut RelationshipSet,
) {
    let before = rels.len();

    for stmt in statements {
        let Statement::AlterTable(alter) = stmt else {
            continue;
        };

        for constraint in &alter.added {
            let ConstraintSpec::ForeignKey(fk) = constraint else {
                continue;
            };

            for (source, target) in fk.pairs() {
                let link = resolve(
                    tables,
                    alter.name.as_deref(),
                    fk.target_table.as_deref(),
                    source,
                    target,
                );
                match link {
                    Some(link) => apply(tables, rels, link),
                    None => tracing::debug!(
                        table = alter.name.as_deref().unwrap_or_default(),
                        column = source,
                        target = fk.target_table.as_deref().unwrap_or_default(),
                        "dropping unresolved ALTER TABLE foreign key"
                    ),
                }
            }
        }
    }

    tracing::debug!(added = rels.len() - before, "reconciled ALTER TABLE statements");
}

fn resolve(
    tables: &[Table],
    table: Option<&str>,
    target_table: Option<&str>,
    source: &str,
    target: &str,
) -> Option<Link> {
    let table = table?;
    let target_table = target_table?;

    let table_idx = tables.iter().position(|t| same_ident(&t.name, table))?;
    let owner = &tables[table_idx];
    let column_idx = owner
        .columns
        .iter()
        .position(|c| same_ident(&c.name, source))?;
    let referenced = tables.iter().find(|t| same_ident(&t.name, target_table))?;
    let target_column = referenced
        .column(target)
        .map(|c| c.name.as_str())
        .unwrap_or(target);

    Some(Link {
        table: table_idx,
        column: column_idx,
        rel: Relationship::new(
            &owner.name,
            &owner.columns[column_idx].name,
            &referenced.name,
            target_column,
        ),
    })
}

fn apply(tables: &mut [Table], rels: &mut RelationshipSet, link: Link) {
    if rels.contains(&link.rel.id) {
        tracing::debug!(id = %link.rel.id, "foreign key already known");
        return;
    }
    tables[link.table].columns[link.column].link(link.rel.target(), false);
    rels.insert(link.rel);
}
