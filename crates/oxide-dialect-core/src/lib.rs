//! # oxide-dialect-core
//!
//! Pluggable SQL dialects for a small ORM.
//!
//! A dialect turns a backend-agnostic `Model` into backend-specific SQL:
//! column types, an INSERT that hands back the generated key, foreign-key
//! clauses and index statements. Everything else (connections, query
//! building, migrations) lives outside this crate and talks to it through
//! `Model`, `QueryExecutor` and the `Dialect` trait.
//!
//! ```rust
//! use oxide_dialect_core::{BaseDialect, Dialect, DialectRegistry, Field, Id, Model};
//!
//! let mut registry = DialectRegistry::new();
//! registry.register(BaseDialect::NAME, BaseDialect::new());
//!
//! let dialect = registry.require("base").unwrap();
//! let model = Model::new("users", "id")
//!     .field(Field::of("id", &Id(0)))
//!     .field(Field::of("name", &String::from("alice")).size(64));
//!
//! let (sql, params) = dialect.insert_sql(&model);
//! assert_eq!(sql, r#"INSERT INTO "users" ("name") VALUES ($1)"#);
//! assert_eq!(params.len(), 1);
//! ```

pub mod builder;
pub mod dialect;
mod error;
pub mod executor;
pub mod field;
pub mod model;
pub mod registry;
pub mod value;

pub use dialect::{BaseDialect, Dialect};
pub use error::{DialectError, Result};
pub use executor::{ExecOutcome, QueryExecutor};
pub use field::{
    Created, CreatedUtc, Field, FieldKind, FieldType, Id, Primitive, Stamp, TimeUtc, Updated,
    UpdatedUtc, Zone,
};
pub use model::{Entity, ForeignKey, Index, Model, ReferentialAction};
pub use registry::DialectRegistry;
pub use value::SqlValue;

