//! CockroachDB dialect implementation.

use async_trait::async_trait;
use oxide_dialect_core::builder::{columns_markers_and_values, quote_joined};
use oxide_dialect_core::{
    Dialect, DialectError, FieldKind, ForeignKey, Model, Primitive, QueryExecutor, Result,
    SqlValue, Zone,
};
use tracing::debug;

/// Strings at or above this size have no bounded column type.
const MAX_VARCHAR: usize = 65532;

/// CockroachDB dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct CockroachDialect;

impl CockroachDialect {
    /// Registry name of the CockroachDB dialect.
    pub const NAME: &'static str = "cockroachdb";

    /// Creates a new CockroachDB dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Dialect for CockroachDialect {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn sql_type(&self, kind: &FieldKind, size: usize) -> Result<String> {
        let sql = match kind {
            FieldKind::Id => "BIGSERIAL".to_string(),
            FieldKind::Timestamp(Zone::Local, _) => "TIMESTAMP WITH TIME ZONE".to_string(),
            FieldKind::Timestamp(Zone::Utc, _) => "TIMESTAMP".to_string(),
            FieldKind::Value(Primitive::Bytes) => "BYTEA".to_string(),
            FieldKind::Value(p) | FieldKind::Nullable(p) => match p {
                Primitive::Bool => "BOOLEAN".to_string(),
                Primitive::Int8
                | Primitive::Int16
                | Primitive::Int32
                | Primitive::Int
                | Primitive::Uint8
                | Primitive::Uint16
                | Primitive::Uint32
                | Primitive::Uint => "INTEGER".to_string(),
                Primitive::Int64 | Primitive::Uint64 => "BIGINT".to_string(),
                Primitive::Float32 | Primitive::Float64 => "DOUBLE PRECISION".to_string(),
                Primitive::String if size > 0 && size < MAX_VARCHAR => format!("VARCHAR({size})"),
                Primitive::String => "TEXT".to_string(),
                // Only nullable bytes get here.
                Primitive::Bytes => {
                    return Err(DialectError::UnsupportedFieldType { kind: kind.clone() })
                }
            },
            FieldKind::Unsupported(_) => {
                return Err(DialectError::UnsupportedFieldType { kind: kind.clone() })
            }
        };
        Ok(sql)
    }

    fn keyword_auto_increment(&self) -> &'static str {
        // BIGSERIAL fills the key; there is no keyword to emit.
        ""
    }

    fn insert_sql(&self, model: &Model) -> (String, Vec<SqlValue>) {
        let mut pos = 0;
        let parts = columns_markers_and_values(self, model, &mut pos);
        let target = if parts.columns.is_empty() {
            String::from("DEFAULT VALUES")
        } else {
            format!(
                "({}) VALUES ({})",
                quote_joined(self, &parts.columns),
                parts.markers.join(", "),
            )
        };
        let sql = format!(
            "INSERT INTO {} {} RETURNING {}",
            self.quote(&model.table),
            target,
            self.quote(&model.primary_key),
        );
        (sql, parts.values)
    }

    async fn insert(&self, executor: &dyn QueryExecutor, model: &Model) -> Result<i64> {
        let (sql, values) = self.insert_sql(model);
        debug!(table = %model.table, %sql, "inserting row");
        Ok(executor.fetch_scalar_i64(&sql, values).await?)
    }

    fn foreign_key(&self, fk: &ForeignKey) -> String {
        // Referential actions are not supported by CockroachDB yet.
        format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            self.quote(&fk.name),
            self.quote(&fk.column),
            self.quote(&fk.reference_table),
            self.quote(&fk.reference_column),
        )
    }

    fn create_index_sql(&self, name: &str, table: &str, unique: bool, columns: &[&str]) -> String {
        let columns = quote_joined(self, columns);
        let sql = if unique {
            format!(
                "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE({})",
                self.quote(table),
                self.quote(name),
                columns,
            )
        } else {
            format!(
                "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                self.quote(name),
                self.quote(table),
                columns,
            )
        };
        debug!(%sql, "generated index statement");
        sql
    }
}
