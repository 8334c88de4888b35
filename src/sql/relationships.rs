//! Ordered relationship list with id-based de-duplication.

use std::collections::HashSet;

use crate::model::Relationship;
use crate::sql::ident::same_ident;

#[derive(Debug, Default)]
pub(crate) struct RelationshipSet {
    list: Vec<Relationship>,
    ids: HashSet<String>,
}

impl RelationshipSet {
    /// Append unless a relationship with the same id is already present.
    ///
    /// Returns `true` when the relationship was added.
    pub fn insert(&mut self, rel: Relationship) -> bool {
        if !self.ids.insert(rel.id.clone()) {
            tracing::debug!(id = %rel.id, "skipping duplicate relationship");
            return false;
        }
        self.list.push(rel);
        true
    }

    /// Drop every relationship that starts at `table`, ignoring case.
    pub fn remove_source_table(&mut self, table: &str) {
        self.list.retain(|r| !same_ident(&r.source_table, table));
        self.ids = self.list.iter().map(|r| r.id.clone()).collect();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Whether any recorded relationship starts at `table.column`.
    pub fn has_source(&self, table: &str, column: &str) -> bool {
        self.list
            .iter()
            .any(|r| same_ident(&r.source_table, table) && same_ident(&r.source_column, column))
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_vec(self) -> Vec<Relationship> {
        self.list
    }
}
