//! Query execution seam.
//!
//! Dialects never own a connection. `Dialect::insert` receives something
//! that can run one parameterized statement; this module defines that
//! contract and implements it for the sqlx pools.

use async_trait::async_trait;
use sqlx::postgres::PgPool;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use crate::value::SqlValue;

/// Outcome of a statement run without fetching rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExecOutcome {
    /// Rows touched by the statement.
    pub rows_affected: u64,
    /// Key generated by the backend, where it reports one.
    pub last_insert_id: Option<i64>,
}

/// Something that can run a parameterized SQL statement.
///
/// Errors are returned as-is; implementations must not retry.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Runs `sql` and scans the first column of the single returned row.
    async fn fetch_scalar_i64(&self, sql: &str, values: Vec<SqlValue>) -> Result<i64, sqlx::Error>;

    /// Runs `sql` without reading rows.
    async fn execute(&self, sql: &str, values: Vec<SqlValue>) -> Result<ExecOutcome, sqlx::Error>;
}

macro_rules! bind_value {
    ($query:expr, $value:expr) => {
        match $value {
            SqlValue::Null => $query.bind(Option::<i64>::None),
            SqlValue::Bool(b) => $query.bind(b),
            SqlValue::Int(i) => $query.bind(i),
            SqlValue::Float(f) => $query.bind(f),
            SqlValue::Text(s) => $query.bind(s),
            SqlValue::Blob(b) => $query.bind(b),
            SqlValue::Timestamp(ts) => $query.bind(ts),
            SqlValue::NaiveTimestamp(ts) => $query.bind(ts),
        }
    };
}

#[async_trait]
impl QueryExecutor for PgPool {
    async fn fetch_scalar_i64(&self, sql: &str, values: Vec<SqlValue>) -> Result<i64, sqlx::Error> {
        debug!(sql, params = values.len(), "fetching scalar");
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for value in values {
            query = bind_value!(query, value);
        }
        query.fetch_one(self).await
    }

    async fn execute(&self, sql: &str, values: Vec<SqlValue>) -> Result<ExecOutcome, sqlx::Error> {
        debug!(sql, params = values.len(), "executing statement");
        let mut query = sqlx::query(sql);
        for value in values {
            query = bind_value!(query, value);
        }
        let result = query.execute(self).await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: None,
        })
    }
}

#[async_trait]
impl QueryExecutor for SqlitePool {
    async fn fetch_scalar_i64(&self, sql: &str, values: Vec<SqlValue>) -> Result<i64, sqlx::Error> {
        debug!(sql, params = values.len(), "fetching scalar");
        let mut query = sqlx::query_scalar::<_, i64>(sql);
        for value in values {
            query = bind_value!(query, value);
        }
        query.fetch_one(self).await
    }

    async fn execute(&self, sql: &str, values: Vec<SqlValue>) -> Result<ExecOutcome, sqlx::Error> {
        debug!(sql, params = values.len(), "executing statement");
        let mut query = sqlx::query(sql);
        for value in values {
            query = bind_value!(query, value);
        }
        let result = query.execute(self).await?;
        Ok(ExecOutcome {
            rows_affected: result.rows_affected(),
            last_insert_id: Some(result.last_insert_rowid()),
        })
    }
}
