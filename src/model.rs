//! Entity-relationship model produced from SQL DDL.

use serde::{Deserialize, Serialize};

use crate::sql::ident::same_ident;
use crate::sql::types;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

impl Schema {
    /// Find a table by name, ignoring case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| same_ident(&t.name, name))
    }

    pub fn relationship(&self, id: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub name: String,
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            columns,
        }
    }

    /// Find a column by name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| same_ident(&c.name, name))
    }

    /// First primary-key column in declaration order.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.is_primary_key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_not_null: bool,
    pub is_unique: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<ColumnRef>,
}

impl Column {
    /// Create a plain column. Every flag starts cleared.
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            is_primary_key: false,
            is_foreign_key: false,
            is_not_null: false,
            is_unique: false,
            default_value: None,
            references: None,
        }
    }

    /// Mark as primary key. A primary key is always NOT NULL.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_not_null = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_not_null = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.is_unique = true;
        self
    }

    /// Lowercase type name without its parameters (`VARCHAR(255)` -> `varchar`).
    pub fn type_family(&self) -> String {
        types::base_type(&self.typ)
    }

    pub fn is_integer(&self) -> bool {
        types::is_integer_type(&self.typ)
    }

    /// Attach a foreign-key target.
    ///
    /// With `overwrite == false` an existing reference is kept and only the
    /// foreign-key flag is set.
    pub(crate) fn link(&mut self, target: ColumnRef, overwrite: bool) {
        self.is_foreign_key = true;
        if overwrite || self.references.is_none() {
            self.references = Some(target);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    #[serde(rename = "type", default)]
    pub kind: RelationshipKind,
}

impl Relationship {
    /// Build a one-to-many edge. The id is `source.col->target.col`.
    pub fn new(
        source_table: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
    ) -> Self {
        Self {
            id: Self::make_id(source_table, source_column, target_table, target_column),
            source_table: source_table.to_string(),
            source_column: source_column.to_string(),
            target_table: target_table.to_string(),
            target_column: target_column.to_string(),
            kind: RelationshipKind::OneToMany,
        }
    }

    pub fn make_id(
        source_table: &str,
        source_column: &str,
        target_table: &str,
        target_column: &str,
    ) -> String {
        format!("{source_table}.{source_column}->{target_table}.{target_column}")
    }

    /// The column this edge points at.
    pub fn target(&self) -> ColumnRef {
        ColumnRef::new(&self.target_table, &self.target_column)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    OneToOne,
    #[default]
    OneToMany,
    ManyToMany,
}
