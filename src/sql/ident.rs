//! Identifier cleaning and comparison.

use sqlparser::ast::{Ident, ObjectName};

/// Strip quoting characters and surrounding whitespace from an identifier.
pub fn clean_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '`' | '"' | '\'' | '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Case-insensitive identifier equality.
pub fn same_ident(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Cleaned value of an [`Ident`], `None` when nothing is left.
pub(crate) fn from_ident(ident: &Ident) -> Option<String> {
    let name = clean_identifier(&ident.value);
    (!name.is_empty()).then_some(name)
}

/// Last part of a possibly qualified name (`schema.table` -> `table`).
pub(crate) fn from_object_name(name: &ObjectName) -> Option<String> {
    name.0.last().and_then(from_ident)
}
