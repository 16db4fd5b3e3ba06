//! Table descriptions handed to a dialect.
//!
//! A `Model` is built per call (by hand, by `#[derive(Entity)]`, or from
//! JSON) and only borrowed by the dialect while it renders a statement.

use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Referential action for ON UPDATE / ON DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferentialAction {
    /// Error if the referenced row changes.
    #[default]
    NoAction,
    /// Like `NoAction`, checked immediately.
    Restrict,
    /// Propagate the change to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl ReferentialAction {
    /// Returns the SQL representation of this action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// A foreign-key constraint owned by one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Owning column.
    pub column: String,
    /// Referenced table.
    pub reference_table: String,
    /// Referenced column.
    pub reference_column: String,
    /// Action on update, if any.
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
    /// Action on delete, if any.
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
}

impl ForeignKey {
    /// Creates a foreign key without referential actions.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        column: impl Into<String>,
        reference_table: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            reference_table: reference_table.into(),
            reference_column: reference_column.into(),
            on_update: None,
            on_delete: None,
        }
    }

    /// Sets the ON UPDATE action.
    #[must_use]
    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    /// Sets the ON DELETE action.
    #[must_use]
    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }
}

/// An index or unique constraint over one or more columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Index {
    /// Index or constraint name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether this is a unique constraint.
    #[serde(default)]
    pub unique: bool,
}

impl Index {
    /// Creates an index.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: &[&str], unique: bool) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(|c| (*c).to_string()).collect(),
            unique,
        }
    }
}

/// One table instance: name, ordered fields and primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    /// Table name.
    pub table: String,
    /// Name of the primary-key column.
    pub primary_key: String,
    /// Fields in column order.
    pub fields: Vec<Field>,
    /// Foreign keys declared on the table.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKey>,
    /// Indexes declared on the table.
    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new(table: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: primary_key.into(),
            fields: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    /// Appends an index.
    #[must_use]
    pub fn index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Returns the primary-key field, if the model declares it.
    #[must_use]
    pub fn pk(&self) -> Option<&Field> {
        self.field_named(&self.primary_key)
    }

    /// Looks a field up by column name.
    #[must_use]
    pub fn field_named(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns whether `field` is the primary key.
    #[must_use]
    pub fn is_pk(&self, field: &Field) -> bool {
        field.name == self.primary_key
    }
}

/// Application types that describe themselves as a `Model`.
///
/// Usually implemented with `#[derive(Entity)]`.
pub trait Entity {
    /// Table name.
    const TABLE: &'static str;

    /// Primary-key column name.
    const PRIMARY_KEY: &'static str;

    /// Snapshots the current values into a model.
    fn to_model(&self) -> Model;
}
