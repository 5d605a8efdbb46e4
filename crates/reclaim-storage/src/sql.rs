// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL construction for the generic collection gateway.
//!
//! Collection and column names are interpolated into statements, so every
//! identifier is checked against a strict charset first; values always go
//! through bound parameters.

use reclaim_core::types::{Filter, OrderBy, Query, Row};
use reclaim_core::ReclaimError;

/// Reject anything that is not a plain SQL identifier.
pub fn check_identifier(name: &str) -> Result<(), ReclaimError> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(ReclaimError::Internal(format!(
            "invalid identifier `{name}`"
        )))
    }
}

/// Convert a JSON value into a bindable SQLite value.
///
/// Arrays and nested objects are stored as their JSON text; the schema has
/// no such columns today.
pub fn to_sql_value(value: &serde_json::Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        serde_json::Value::Null => Sql::Null,
        serde_json::Value::Bool(b) => Sql::Integer(i64::from(*b)),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Sql::Integer(i)
            } else {
                Sql::Real(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Sql::Text(s.clone()),
        other => Sql::Text(other.to_string()),
    }
}

/// Convert a SQLite value back into JSON.
pub fn value_ref_to_json(value: rusqlite::types::ValueRef<'_>) -> serde_json::Value {
    use rusqlite::types::ValueRef;
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Value::from(f),
        ValueRef::Text(t) => serde_json::Value::from(String::from_utf8_lossy(t).into_owned()),
        // No blob columns exist in the schema.
        ValueRef::Blob(_) => serde_json::Value::Null,
    }
}

/// Build a `WHERE` clause and its bound values. Empty filters yield an
/// empty clause.
pub fn build_where(
    filters: &[Filter],
) -> Result<(String, Vec<rusqlite::types::Value>), ReclaimError> {
    if filters.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut clauses = Vec::with_capacity(filters.len());
    let mut values = Vec::with_capacity(filters.len());
    for filter in filters {
        let (column, op, value) = match filter {
            Filter::Eq(column, value) => (column, "=", value),
            Filter::Ne(column, value) => (column, "<>", value),
        };
        check_identifier(column)?;
        if value.is_null() {
            // SQL null never equals anything; use IS / IS NOT instead.
            let is_op = if op == "=" { "IS NULL" } else { "IS NOT NULL" };
            clauses.push(format!("{column} {is_op}"));
        } else {
            clauses.push(format!("{column} {op} ?"));
            values.push(to_sql_value(value));
        }
    }

    Ok((format!(" WHERE {}", clauses.join(" AND ")), values))
}

/// Build the full `SELECT` statement for a query.
pub fn select_sql(query: &Query) -> Result<(String, Vec<rusqlite::types::Value>), ReclaimError> {
    let (where_clause, values) = build_where(&query.filters)?;
    let mut sql = format!("SELECT * FROM {}{}", query.collection, where_clause);

    if let Some(OrderBy { column, descending }) = &query.order {
        check_identifier(column)?;
        let direction = if *descending { "DESC" } else { "ASC" };
        sql.push_str(&format!(" ORDER BY {column} {direction}"));
    }
    if let Some(limit) = query.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    Ok((sql, values))
}

/// Build an `INSERT` statement for one row.
pub fn insert_sql(
    table: &str,
    row: &Row,
) -> Result<(String, Vec<rusqlite::types::Value>), ReclaimError> {
    if row.is_empty() {
        return Err(ReclaimError::Internal("cannot insert an empty row".into()));
    }
    let mut columns = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (column, value) in row {
        check_identifier(column)?;
        columns.push(column.as_str());
        values.push(to_sql_value(value));
    }
    let placeholders = vec!["?"; columns.len()].join(", ");
    let sql = format!(
        "INSERT INTO {table} ({}) VALUES ({placeholders})",
        columns.join(", ")
    );
    Ok((sql, values))
}

/// Build an `UPDATE` statement applying `patch` to rows matching `filters`.
pub fn update_sql(
    table: &str,
    patch: &Row,
    filters: &[Filter],
) -> Result<(String, Vec<rusqlite::types::Value>), ReclaimError> {
    if patch.is_empty() {
        return Err(ReclaimError::Internal("cannot apply an empty patch".into()));
    }
    let mut assignments = Vec::with_capacity(patch.len());
    let mut values = Vec::with_capacity(patch.len());
    for (column, value) in patch {
        check_identifier(column)?;
        assignments.push(format!("{column} = ?"));
        values.push(to_sql_value(value));
    }
    let (where_clause, where_values) = build_where(filters)?;
    values.extend(where_values);
    let sql = format!(
        "UPDATE {table} SET {}{}",
        assignments.join(", "),
        where_clause
    );
    Ok((sql, values))
}

/// Read all columns of the current row into a JSON object.
pub fn row_to_json(row: &rusqlite::Row<'_>, columns: &[String]) -> rusqlite::Result<Row> {
    let mut out = Row::new();
    for (i, name) in columns.iter().enumerate() {
        out.insert(name.clone(), value_ref_to_json(row.get_ref(i)?));
    }
    Ok(out)
}
