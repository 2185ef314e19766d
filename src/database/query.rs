/*!
 * Generic row access over the course database.
 *
 * Course databases come in more than one layout, so the loading code reads
 * rows as column-name maps instead of fixed tuples. A column that a given
 * layout lacks simply reads as `None`.
 */

use async_trait::async_trait;
use rusqlite::Connection;
use rusqlite::types::Value;
use std::collections::HashMap;

use super::connection::DatabaseConnection;
use crate::errors::QueryError;

/// One result row keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: HashMap<String, Value>,
}

impl Row {
    /// Build a row from `(column, value)` pairs; later duplicates win
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        Self {
            columns: pairs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Whether the row carries the column at all (even if NULL)
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Raw value of a column
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// Integer value; numeric text is accepted
    pub fn get_i64(&self, column: &str) -> Option<i64> {
        match self.columns.get(column)? {
            Value::Integer(n) => Some(*n),
            Value::Real(f) if f.fract() == 0.0 => Some(*f as i64),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Floating point value; integers and numeric text are accepted
    pub fn get_f64(&self, column: &str) -> Option<f64> {
        match self.columns.get(column)? {
            Value::Integer(n) => Some(*n as f64),
            Value::Real(f) => Some(*f),
            Value::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Text value; numbers are rendered, NULL and blobs read as `None`
    pub fn get_text(&self, column: &str) -> Option<String> {
        match self.columns.get(column)? {
            Value::Text(s) => Some(s.clone()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Real(f) => Some(f.to_string()),
            Value::Null | Value::Blob(_) => None,
        }
    }

    /// Text value with blank strings treated as absent
    pub fn get_non_empty_text(&self, column: &str) -> Option<String> {
        self.get_text(column).filter(|s| !s.trim().is_empty())
    }

    /// First non-empty text among several candidate column names
    pub fn first_text(&self, columns: &[&str]) -> Option<String> {
        columns.iter().find_map(|c| self.get_non_empty_text(c))
    }
}

/// Read-only query interface consumed by the loading components
///
/// Implementations return an empty vector for an empty result and an error
/// for malformed SQL or a missing table.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a query and return every row in database order
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Row>, QueryError>;
}

/// Run a query synchronously, mapping every row to a `Row`
pub fn query_rows(conn: &Connection, sql: &str, params: &[Value]) -> rusqlite::Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let names: Vec<String> = stmt.column_names().iter().map(|n| n.to_string()).collect();

    let rows = stmt
        .query_map(rusqlite::params_from_iter(params.iter()), |row| {
            let mut pairs = Vec::with_capacity(names.len());
            for (idx, name) in names.iter().enumerate() {
                pairs.push((name.clone(), row.get::<_, Value>(idx)?));
            }
            Ok(Row::from_pairs(pairs))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(rows)
}

#[async_trait]
impl QueryExecutor for DatabaseConnection {
    async fn query(&self, sql: &str, params: Vec<Value>) -> Result<Vec<Row>, QueryError> {
        let sql = sql.to_string();

        self.execute_async(move |conn| Ok(query_rows(conn, &sql, &params)?))
            .await
            .map_err(QueryError::from)
    }
}
