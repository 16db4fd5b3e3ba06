//! Error types for dialect operations.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors raised while generating or executing dialect SQL.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The field kind has no column type in this dialect.
    #[error("unsupported field type: {kind}")]
    UnsupportedFieldType {
        /// The offending kind.
        kind: FieldKind,
    },

    /// Error reported by the query executor, passed through untouched.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// The backend did not report a generated key for an insert.
    #[error("no generated key returned for insert into {table}")]
    MissingGeneratedKey {
        /// Target table.
        table: String,
    },

    /// The model names a primary key it does not contain.
    #[error("model {table} has no primary key field {primary_key}")]
    MissingPrimaryKey {
        /// Table name.
        table: String,
        /// Declared primary-key column.
        primary_key: String,
    },

    /// No dialect is registered under the name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// The process-wide registry was installed twice.
    #[error("dialect registry already installed")]
    RegistryAlreadyInstalled,
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
