//! SQL dialect support.
//!
//! Different databases disagree on column types, identifier quoting and
//! how a generated key comes back from an INSERT. The `Dialect` trait is
//! the whole contract a backend implements. Its provided methods are the
//! base behavior; a backend overrides only where it diverges, and
//! `BaseDialect` is the backend that overrides nothing.

mod base;

pub use base::BaseDialect;

use async_trait::async_trait;
use tracing::debug;

use crate::builder::{columns_markers_and_values, quote_joined};
use crate::error::{DialectError, Result};
use crate::executor::QueryExecutor;
use crate::field::{Field, FieldKind, Primitive, Zone};
use crate::model::{ForeignKey, Model, ReferentialAction};
use crate::value::SqlValue;

/// SQL generation rules for one backend.
#[async_trait]
pub trait Dialect: Send + Sync {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Quotes an identifier, doubling any embedded quote character.
    fn quote(&self, name: &str) -> String {
        let q = self.quote_char();
        let escaped = name.replace(q, &format!("{q}{q}"));
        format!("{q}{escaped}{q}")
    }

    /// Returns the next placeholder marker and advances `pos`.
    fn next_marker(&self, pos: &mut usize) -> String {
        *pos += 1;
        format!("${}", *pos)
    }

    /// Maps a field kind and size hint to a column type.
    fn sql_type(&self, kind: &FieldKind, size: usize) -> Result<String> {
        let sql = match kind {
            FieldKind::Id => "BIGINT".to_string(),
            FieldKind::Timestamp(Zone::Local, _) => "TIMESTAMP WITH TIME ZONE".to_string(),
            FieldKind::Timestamp(Zone::Utc, _) => "TIMESTAMP".to_string(),
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
                Primitive::Float32 => "REAL".to_string(),
                Primitive::Float64 => "DOUBLE PRECISION".to_string(),
                Primitive::Bytes => "BLOB".to_string(),
                Primitive::String if size > 0 => format!("VARCHAR({size})"),
                Primitive::String => "TEXT".to_string(),
            },
            FieldKind::Unsupported(_) => {
                return Err(DialectError::UnsupportedFieldType { kind: kind.clone() })
            }
        };
        Ok(sql)
    }

    /// Returns the keyword that makes a key column auto-increment.
    ///
    /// An empty string means the backend relies on a generated column type
    /// instead, and nothing should be emitted.
    fn keyword_auto_increment(&self) -> &'static str {
        "GENERATED BY DEFAULT AS IDENTITY"
    }

    /// Renders a referential action.
    fn referential_action(&self, action: ReferentialAction) -> &'static str {
        action.as_sql()
    }

    /// Generates an INSERT for the model and the values to bind.
    fn insert_sql(&self, model: &Model) -> (String, Vec<SqlValue>) {
        let mut pos = 0;
        let parts = columns_markers_and_values(self, model, &mut pos);
        let sql = if parts.columns.is_empty() {
            format!("INSERT INTO {} DEFAULT VALUES", self.quote(&model.table))
        } else {
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.quote(&model.table),
                quote_joined(self, &parts.columns),
                parts.markers.join(", "),
            )
        };
        (sql, parts.values)
    }

    /// Inserts the model and returns the key generated by the backend.
    ///
    /// The base implementation reads the executor's last-insert id.
    async fn insert(&self, executor: &dyn QueryExecutor, model: &Model) -> Result<i64> {
        let (sql, values) = self.insert_sql(model);
        debug!(dialect = self.name(), table = %model.table, %sql, "inserting row");
        let outcome = executor.execute(&sql, values).await?;
        outcome
            .last_insert_id
            .ok_or_else(|| DialectError::MissingGeneratedKey {
                table: model.table.clone(),
            })
    }

    /// Generates a foreign-key table constraint.
    fn foreign_key(&self, fk: &ForeignKey) -> String {
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            self.quote(&fk.name),
            self.quote(&fk.column),
            self.quote(&fk.reference_table),
            self.quote(&fk.reference_column),
        );
        if let Some(action) = fk.on_update {
            sql.push_str(" ON UPDATE ");
            sql.push_str(self.referential_action(action));
        }
        if let Some(action) = fk.on_delete {
            sql.push_str(" ON DELETE ");
            sql.push_str(self.referential_action(action));
        }
        sql
    }

    /// Generates an index or unique-index statement.
    fn create_index_sql(&self, name: &str, table: &str, unique: bool, columns: &[&str]) -> String {
        let mut sql = String::from("CREATE ");
        if unique {
            sql.push_str("UNIQUE ");
        }
        sql.push_str(&format!(
            "INDEX {} ON {} ({})",
            self.quote(name),
            self.quote(table),
            quote_joined(self, columns),
        ));
        sql
    }

    /// Generates DROP INDEX.
    fn drop_index_sql(&self, name: &str) -> String {
        format!("DROP INDEX {}", self.quote(name))
    }

    /// Generates one column definition for CREATE TABLE.
    fn column_sql(&self, field: &Field, primary_key: bool) -> Result<String> {
        let mut sql = format!(
            "{} {}",
            self.quote(&field.name),
            self.sql_type(&field.kind, field.size)?
        );

        if primary_key {
            sql.push_str(" PRIMARY KEY");
            let keyword = self.keyword_auto_increment();
            if field.kind == FieldKind::Id && !keyword.is_empty() {
                sql.push(' ');
                sql.push_str(keyword);
            }
        } else if field.not_null {
            sql.push_str(" NOT NULL");
        }

        if let Some(ref default) = field.default {
            sql.push_str(" DEFAULT ");
            sql.push_str(default);
        }

        Ok(sql)
    }

    /// Generates CREATE TABLE with column definitions and foreign keys.
    fn create_table_sql(&self, model: &Model, if_not_exists: bool) -> Result<String> {
        if model.pk().is_none() {
            return Err(DialectError::MissingPrimaryKey {
                table: model.table.clone(),
                primary_key: model.primary_key.clone(),
            });
        }

        let mut defs = Vec::with_capacity(model.fields.len() + model.foreign_keys.len());
        for field in &model.fields {
            defs.push(format!("    {}", self.column_sql(field, model.is_pk(field))?));
        }
        for fk in &model.foreign_keys {
            defs.push(format!("    {}", self.foreign_key(fk)));
        }

        let mut sql = String::from("CREATE TABLE ");
        if if_not_exists {
            sql.push_str("IF NOT EXISTS ");
        }
        sql.push_str(&self.quote(&model.table));
        sql.push_str(" (\n");
        sql.push_str(&defs.join(",\n"));
        sql.push_str("\n)");
        Ok(sql)
    }

    /// Generates DROP TABLE.
    fn drop_table_sql(&self, table: &str, if_exists: bool) -> String {
        let mut sql = String::from("DROP TABLE ");
        if if_exists {
            sql.push_str("IF EXISTS ");
        }
        sql.push_str(&self.quote(table));
        sql
    }
}
