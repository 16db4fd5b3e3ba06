//! Tests for `CockroachDialect::insert`.
//!
//! Most cases use a recording executor that answers with a canned scalar
//! or error; the last section runs against an in-memory SQLite pool.

use std::sync::Mutex;

use async_trait::async_trait;
use oxide_dialect_cockroach::CockroachDialect;
use oxide_dialect_core::{
    Dialect, DialectError, DialectRegistry, Entity, ExecOutcome, Id, QueryExecutor, SqlValue,
};
use oxide_dialect_derive::Entity;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

// =============================================================================
// Recording executor
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Scalar(String, Vec<SqlValue>),
    Execute(String, Vec<SqlValue>),
}

struct Recorder {
    scalar: Option<i64>,
    calls: Mutex<Vec<Call>>,
}

impl Recorder {
    fn returning(id: i64) -> Self {
        Self {
            scalar: Some(id),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn empty() -> Self {
        Self {
            scalar: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for Recorder {
    async fn fetch_scalar_i64(&self, sql: &str, values: Vec<SqlValue>) -> Result<i64, sqlx::Error> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Scalar(sql.to_string(), values));
        self.scalar.ok_or(sqlx::Error::RowNotFound)
    }

    async fn execute(&self, sql: &str, values: Vec<SqlValue>) -> Result<ExecOutcome, sqlx::Error> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Execute(sql.to_string(), values));
        Ok(ExecOutcome {
            rows_affected: 1,
            last_insert_id: None,
        })
    }
}

#[derive(Debug, Entity)]
#[entity(table = "users")]
struct User {
    id: Id,
    #[entity(size = 255, not_null)]
    name: String,
    age: Option<i32>,
}

// =============================================================================
// Test: RETURNING round trip
// =============================================================================

#[tokio::test]
async fn test_insert_returns_generated_key() {
    let executor = Recorder::returning(812_734_215_000_000_001);
    let user = User {
        id: Id(0),
        name: "alice".to_string(),
        age: Some(31),
    };

    let id = CockroachDialect::new()
        .insert(&executor, &user.to_model())
        .await
        .unwrap();
    assert_eq!(id, 812_734_215_000_000_001);

    assert_eq!(
        executor.calls(),
        vec![Call::Scalar(
            r#"INSERT INTO "users" ("name", "age") VALUES ($1, $2) RETURNING "id""#.to_string(),
            vec![SqlValue::Text("alice".into()), SqlValue::Int(31)],
        )]
    );
}

#[tokio::test]
async fn test_insert_with_explicit_key() {
    let executor = Recorder::returning(7);
    let user = User {
        id: Id(7),
        name: "bob".to_string(),
        age: None,
    };

    let id = CockroachDialect::new()
        .insert(&executor, &user.to_model())
        .await
        .unwrap();
    assert_eq!(id, 7);

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    let Call::Scalar(sql, values) = &calls[0] else {
        panic!("expected a scalar fetch, got {:?}", calls[0]);
    };
    assert_eq!(
        sql,
        r#"INSERT INTO "users" ("id", "name", "age") VALUES ($1, $2, $3) RETURNING "id""#
    );
    assert_eq!(
        values,
        &vec![SqlValue::Int(7), SqlValue::Text("bob".into()), SqlValue::Null]
    );
}

#[tokio::test]
async fn test_insert_propagates_scan_error() {
    let executor = Recorder::empty();
    let user = User {
        id: Id(0),
        name: "carol".to_string(),
        age: None,
    };

    let err = CockroachDialect::new()
        .insert(&executor, &user.to_model())
        .await
        .unwrap_err();
    assert!(matches!(err, DialectError::Database(sqlx::Error::RowNotFound)));
    assert_eq!(executor.calls().len(), 1);
}

#[tokio::test]
async fn test_insert_through_registry() {
    let mut registry = DialectRegistry::new();
    oxide_dialect_cockroach::register(&mut registry);
    let dialect = registry.require(CockroachDialect::NAME).unwrap();

    let executor = Recorder::returning(1);
    let user = User {
        id: Id(0),
        name: "dave".to_string(),
        age: None,
    };
    assert_eq!(dialect.insert(&executor, &user.to_model()).await.unwrap(), 1);
    assert!(matches!(executor.calls()[0], Call::Scalar(ref sql, _) if sql.ends_with("RETURNING \"id\"")));
}

// =============================================================================
// Test: DDL for the same entity
// =============================================================================

#[test]
fn test_user_create_table() {
    let user = User {
        id: Id(0),
        name: String::new(),
        age: None,
    };
    let sql = CockroachDialect::new()
        .create_table_sql(&user.to_model(), true)
        .unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS \"users\" (\n\
         \x20   \"id\" BIGSERIAL PRIMARY KEY,\n\
         \x20   \"name\" VARCHAR(255) NOT NULL,\n\
         \x20   \"age\" INTEGER\n\
         )"
    );
}

// =============================================================================
// Test: RETURNING against a real pool
// =============================================================================

async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect(":memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");
    sqlx::query(
        "CREATE TABLE \"users\" (\"id\" INTEGER PRIMARY KEY, \"name\" TEXT NOT NULL, \"age\" INTEGER)",
    )
    .execute(&pool)
    .await
    .expect("Failed to create users table");
    pool
}

#[tokio::test]
async fn test_insert_reads_key_back_from_pool() {
    let pool = create_test_pool().await;
    let dialect = CockroachDialect::new();

    let first = User {
        id: Id(0),
        name: "erin".to_string(),
        age: None,
    };
    let second = User {
        id: Id(0),
        name: "frank".to_string(),
        age: Some(52),
    };
    assert_eq!(dialect.insert(&pool, &first.to_model()).await.unwrap(), 1);
    assert_eq!(dialect.insert(&pool, &second.to_model()).await.unwrap(), 2);

    let row: (String, Option<i32>) =
        sqlx::query_as("SELECT \"name\", \"age\" FROM \"users\" WHERE \"id\" = $1")
            .bind(2_i64)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(row, ("frank".to_string(), Some(52)));
}

#[tokio::test]
async fn test_insert_surfaces_constraint_error_from_pool() {
    let pool = create_test_pool().await;
    let dialect = CockroachDialect::new();
    let user = User {
        id: Id(9),
        name: "gina".to_string(),
        age: None,
    };
    assert_eq!(dialect.insert(&pool, &user.to_model()).await.unwrap(), 9);

    let err = dialect.insert(&pool, &user.to_model()).await.unwrap_err();
    assert!(matches!(err, DialectError::Database(sqlx::Error::Database(_))));
}
