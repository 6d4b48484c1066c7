use serde_json::Value;
use sqlx::{self, postgres::PgArguments, FromRow};

use crate::filter::types::FilterWhereInfo;
use crate::filter::FilterWhere;

use super::manager::DatabaseError;

/// Generated SQL and the values to bind, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<Value>,
}

/// `SELECT <columns> FROM <table> WHERE <conditions> ORDER BY <order_by>`
pub fn select_sql(
    table: &str,
    columns: &str,
    conditions: &[FilterWhereInfo],
    order_by: &str,
) -> Result<SqlResult, DatabaseError> {
    let (where_clause, params) =
        FilterWhere::generate(conditions, 0).map_err(|e| DatabaseError::QueryError(e.to_string()))?;
    Ok(SqlResult {
        query: format!(
            "SELECT {} FROM \"{}\" WHERE {} ORDER BY \"{}\"",
            columns, table, where_clause, order_by
        ),
        params,
    })
}

/// `UPDATE` of only the supplied columns, keyed on `key_column`. The key
/// value is bound last.
pub fn partial_update_sql(
    table: &str,
    changes: &[(&'static str, Value)],
    key_column: &str,
    key: &str,
    returning: &str,
) -> Result<SqlResult, DatabaseError> {
    if changes.is_empty() {
        return Err(DatabaseError::QueryError("No data".to_string()));
    }

    let mut params = Vec::with_capacity(changes.len() + 1);
    let set_clause = changes
        .iter()
        .enumerate()
        .map(|(idx, (column, value))| {
            params.push(value.clone());
            format!("\"{}\" = ${}", column, idx + 1)
        })
        .collect::<Vec<_>>()
        .join(", ");
    params.push(Value::String(key.to_string()));

    Ok(SqlResult {
        query: format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = ${} RETURNING {}",
            table,
            set_clause,
            key_column,
            params.len(),
            returning
        ),
        params,
    })
}

pub fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q Value,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        Value::Array(_) | Value::Object(_) => q.bind(v.clone()),
    }
}
