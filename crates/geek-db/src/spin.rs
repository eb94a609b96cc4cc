//! Spin SQLite backend, compiled only for the wasm32 component.

use crate::{DbError, Executor, QueryResult, Row, Value, FOREIGN_KEYS_ON};
use async_trait::async_trait;
use spin_sdk::sqlite;

/// A connection to a database declared in the component manifest.
pub struct SpinDb {
    conn: sqlite::Connection,
}

impl SpinDb {
    /// Open the `default` database.
    pub fn open_default() -> Result<Self, DbError> {
        let conn =
            sqlite::Connection::open_default().map_err(|e| DbError::OpenError(e.to_string()))?;
        Self::with_foreign_keys(conn)
    }

    /// Open a named database.
    pub fn open(name: &str) -> Result<Self, DbError> {
        let conn = sqlite::Connection::open(name).map_err(|e| DbError::OpenError(e.to_string()))?;
        Self::with_foreign_keys(conn)
    }

    /// SQLite leaves foreign keys off per connection unless asked.
    fn with_foreign_keys(conn: sqlite::Connection) -> Result<Self, DbError> {
        let db = Self { conn };
        db.run(FOREIGN_KEYS_ON, &[])
            .map_err(|e| DbError::OpenError(e.to_string()))?;
        Ok(db)
    }

    fn run(&self, sql: &str, params: &[Value]) -> Result<sqlite::QueryResult, DbError> {
        let params: Vec<sqlite::Value> = params.iter().map(to_spin).collect();
        self.conn
            .execute(sql, params.as_slice())
            .map_err(|e| DbError::from_driver(e.to_string()))
    }
}

#[async_trait(?Send)]
impl Executor for SpinDb {
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DbError> {
        self.run(sql, params)?;
        // The host interface does not report affected rows; ask SQLite.
        let changes = self.run("SELECT changes() AS changes", &[])?;
        Ok(changes
            .rows
            .first()
            .and_then(|row| row.values.first())
            .and_then(|v| match v {
                sqlite::Value::Integer(n) => u64::try_from(*n).ok(),
                _ => None,
            })
            .unwrap_or(0))
    }

    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError> {
        let result = self.run(sql, params)?;
        let columns: Vec<String> = result.columns.iter().map(|c| c.to_string()).collect();
        let rows = result
            .rows
            .iter()
            .map(|row| Row::new(columns.clone(), row.values.iter().map(from_spin).collect()))
            .collect();
        Ok(QueryResult::new(columns, rows))
    }
}

fn to_spin(value: &Value) -> sqlite::Value {
    match value {
        Value::Null => sqlite::Value::Null,
        Value::Integer(i) => sqlite::Value::Integer(*i),
        Value::Real(f) => sqlite::Value::Real(*f),
        Value::Text(s) => sqlite::Value::Text(s.clone()),
        Value::Blob(b) => sqlite::Value::Blob(b.clone()),
    }
}

fn from_spin(value: &sqlite::Value) -> Value {
    match value {
        sqlite::Value::Null => Value::Null,
        sqlite::Value::Integer(i) => Value::Integer(*i),
        sqlite::Value::Real(f) => Value::Real(*f),
        sqlite::Value::Text(s) => Value::Text(s.clone()),
        sqlite::Value::Blob(b) => Value::Blob(b.clone()),
    }
}
