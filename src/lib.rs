pub mod model;
pub mod sql;

use wasm_bindgen::prelude::*;

pub use model::{Column, ColumnRef, Relationship, RelationshipKind, Schema, Table};
pub use sql::{Dialect, ParseOptions, SqlParseError, parse_sql, parse_sql_with};

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Parse SQL DDL and return the schema as JSON.
///
/// `dialect` forces a single dialect; without it the fallback chain is used.
#[wasm_bindgen(js_name = "sqlToSchema")]
pub fn sql_to_schema(source: &str, dialect: Option<String>) -> Result<String, String> {
    let options = match dialect.as_deref() {
        Some(name) => Dialect::from_str(name)
            .map(ParseOptions::dialect)
            .ok_or_else(|| format!("Unknown SQL dialect: {name}"))?,
        None => ParseOptions::default(),
    };

    let schema = parse_sql_with(source, &options).map_err(|e| e.to_string())?;
    serde_json::to_string(&schema).map_err(|e| e.to_string())
}
