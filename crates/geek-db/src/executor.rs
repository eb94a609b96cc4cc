//! The statement execution seam shared by every backend.

use crate::{DbError, QueryResult, Value};
use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// Something that can run SQL against a SQLite database.
///
/// Implemented by [`SpinDb`](crate::SpinDb) inside the Spin runtime and by
/// [`SqliteDb`](crate::SqliteDb) on native targets.
#[async_trait(?Send)]
pub trait Executor {
    /// Execute a statement that doesn't return rows and report how many rows
    /// it changed.
    async fn execute(&self, sql: &str, params: &[Value]) -> Result<u64, DbError>;

    /// Execute a query and return raw results.
    async fn query(&self, sql: &str, params: &[Value]) -> Result<QueryResult, DbError>;

    /// Run several `;`-separated statements without parameters.
    async fn execute_batch(&self, sql: &str) -> Result<(), DbError> {
        for statement in split_statements(sql) {
            self.execute(statement, &[]).await?;
        }
        Ok(())
    }

    /// Execute a query and deserialize every row.
    async fn query_as<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Vec<T>, DbError>
    where
        Self: Sized,
    {
        self.query(sql, params).await?.deserialize_all()
    }

    /// Execute a query and deserialize exactly one row.
    async fn query_one<T: DeserializeOwned>(&self, sql: &str, params: &[Value]) -> Result<T, DbError>
    where
        Self: Sized,
    {
        let result = self.query(sql, params).await?;
        result.first().ok_or(DbError::NotFound)?.deserialize()
    }

    /// Execute a query and deserialize the first row, if any.
    async fn query_optional<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[Value],
    ) -> Result<Option<T>, DbError>
    where
        Self: Sized,
    {
        let result = self.query(sql, params).await?;
        result.first().map(|row| row.deserialize()).transpose()
    }
}

/// Split a script into statements on `;`, skipping blanks and `--` comments.
///
/// The schema scripts this is used for never contain `;` inside literals.
pub fn split_statements(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(';').map(str::trim).filter(|statement| {
        statement
            .lines()
            .any(|line| !line.trim().is_empty() && !line.trim_start().starts_with("--"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_statements() {
        let script = "
            -- categories
            CREATE TABLE a (id TEXT);

            CREATE INDEX a_id ON a (id);
            -- trailing comment
        ";
        let statements: Vec<&str> = split_statements(script).collect();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].ends_with("CREATE TABLE a (id TEXT)"));
        assert_eq!(statements[1], "CREATE INDEX a_id ON a (id)");
    }
}
