//! # oxide-dialect-cockroach
//!
//! CockroachDB dialect for `oxide-dialect-core`.
//!
//! # How CockroachDB differs from the base dialect
//!
//! - **[SERIAL]**: there is no auto-increment keyword. Keys use the
//!   `BIGSERIAL` type, which fills the column from `unique_rowid()`, so
//!   `keyword_auto_increment()` is empty.
//! - **[RETURNING]**: the PostgreSQL wire protocol has no last-insert id.
//!   The generated key is read back with `INSERT ... RETURNING`.
//! - **Referential actions**: foreign keys are emitted without
//!   `ON UPDATE` / `ON DELETE` clauses.
//! - **Idempotent indexes**: plain indexes use `CREATE INDEX IF NOT EXISTS`
//!   so schema setup survives retries. Unique constraints are added with
//!   `ALTER TABLE ... ADD CONSTRAINT` and are not guarded.
//!
//! [SERIAL]: https://www.cockroachlabs.com/docs/stable/serial
//! [RETURNING]: https://www.cockroachlabs.com/docs/stable/insert#insert-and-return-values
//!
//! ## Example
//!
//! ```rust
//! use oxide_dialect_core::{Dialect, DialectRegistry, Field, Id, Model};
//!
//! let mut registry = DialectRegistry::new();
//! oxide_dialect_cockroach::register(&mut registry);
//!
//! let dialect = registry.require("cockroachdb").unwrap();
//! let model = Model::new("users", "id")
//!     .field(Field::of("id", &Id(0)))
//!     .field(Field::of("name", &String::from("alice")));
//!
//! let (sql, _params) = dialect.insert_sql(&model);
//! assert_eq!(sql, r#"INSERT INTO "users" ("name") VALUES ($1) RETURNING "id""#);
//! ```

mod dialect;

pub use dialect::CockroachDialect;

use oxide_dialect_core::DialectRegistry;

/// Registers `CockroachDialect` under `CockroachDialect::NAME`.
pub fn register(registry: &mut DialectRegistry) {
    registry.register(CockroachDialect::NAME, CockroachDialect::new());
}
