//! Column type families.
//!
//! Declared types are stored verbatim (`VARCHAR(255)`); comparisons go
//! through the parameter-free family name.

/// Lowercase type name with any `(...)` parameters removed.
pub fn base_type(sql_type: &str) -> String {
    let lower = sql_type.to_lowercase();
    let base = match lower.find('(') {
        Some(open) => {
            let tail = lower[open..].find(')').map(|close| &lower[open + close + 1..]);
            format!("{}{}", &lower[..open], tail.unwrap_or(""))
        }
        None => lower,
    };
    base.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whether the type belongs to the integer family, in any supported dialect.
pub fn is_integer_type(sql_type: &str) -> bool {
    let base = base_type(sql_type);
    let first = base.split_whitespace().next().unwrap_or("");

    matches!(
        first,
        "int"
            | "integer"
            | "int2"
            | "int4"
            | "int8"
            | "tinyint"
            | "smallint"
            | "mediumint"
            | "bigint"
            | "serial"
            | "serial2"
            | "serial4"
            | "serial8"
            | "smallserial"
            | "bigserial"
    )
}
