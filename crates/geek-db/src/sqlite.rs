//! Native SQLite backend on top of sqlx, used by tests and local tooling.

use crate::{DbError, Executor, QueryResult, Row, Value};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::{Column, Row as _, Sqlite, TypeInfo, ValueRef};
use std::str::FromStr;

type SqlxQuery<'q> = sqlx::query::Query<'q, Sqlite, SqliteArguments<'q>>;

/// A pooled SQLite database.
#[derive(Clone)]
pub struct SqliteDb {
    pool: SqlitePool,
}

impl SqliteDb {
    /// Connect to a database URL such as `sqlite://catalog.db`, creating the
    /// file if it does not exist.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbError::OpenError(e.to_string()))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// The pool is pinned to a single connection that never expires, since
    /// every SQLite in-memory connection is its own database.
    pub async fn in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::OpenError(e.to_string()))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(Self { pool })
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait(?Send)]
impl Executor for SqliteDb {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await
            .map_err(driver_error)?;
        Ok(result.rows_affected())
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let rows = bind_all(sqlx::query(sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(driver_error)?;

        let Some(first) = rows.first() else {
            return Ok(QueryResult::default());
        };
        let columns: Vec<String> = first.columns().iter().map(|c| c.name().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| decode_row(&columns, row))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QueryResult::new(columns, rows))
    }
}

fn bind_all<'q>(mut query: SqlxQuery<'q>, params: &[Value]) -> SqlxQuery<'q> {
    for param in params {
        query = match param {
            Value::Null => query.bind(None::<i64>),
            Value::Integer(i) => query.bind(*i),
            Value::Real(f) => query.bind(*f),
            Value::Text(s) => query.bind(s.clone()),
            Value::Blob(b) => query.bind(b.clone()),
        };
    }
    query
}

fn decode_row(columns: &[String], row: &SqliteRow) -> Result<Row, DbError> {
    let mut values = Vec::with_capacity(columns.len());
    for index in 0..columns.len() {
        let raw = row.try_get_raw(index).map_err(type_error)?;
        if raw.is_null() {
            values.push(Value::Null);
            continue;
        }
        // Storage class of the value itself, not the declared column type.
        let storage = raw.type_info().name().to_ascii_uppercase();
        let value = match storage.as_str() {
            "INTEGER" | "INT" | "INT4" | "INT8" | "BIGINT" | "BOOLEAN" => {
                Value::Integer(row.try_get_unchecked::<i64, _>(index).map_err(type_error)?)
            }
            "REAL" | "FLOAT" | "DOUBLE" => {
                Value::Real(row.try_get_unchecked::<f64, _>(index).map_err(type_error)?)
            }
            "BLOB" => Value::Blob(row.try_get_unchecked::<Vec<u8>, _>(index).map_err(type_error)?),
            _ => Value::Text(row.try_get_unchecked::<String, _>(index).map_err(type_error)?),
        };
        values.push(value);
    }
    Ok(Row::new(columns.to_vec(), values))
}

fn driver_error(e: sqlx::Error) -> DbError {
    match &e {
        sqlx::Error::Database(db) => DbError::from_driver(db.message()),
        _ => DbError::QueryError(e.to_string()),
    }
}

fn type_error(e: sqlx::Error) -> DbError {
    DbError::TypeError(e.to_string())
}
