//! Field descriptors and their semantic kinds.
//!
//! A dialect never inspects a field's runtime value to pick a column type.
//! The `FieldKind` is the only input to type mapping, so the mapping is
//! decidable when the schema is defined.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value::SqlValue;

/// Primitive value categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Boolean.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// Platform-sized signed integer.
    Int,
    /// 8-bit unsigned integer.
    Uint8,
    /// 16-bit unsigned integer.
    Uint16,
    /// 32-bit unsigned integer.
    Uint32,
    /// Platform-sized unsigned integer.
    Uint,
    /// 64-bit signed integer.
    Int64,
    /// 64-bit unsigned integer.
    Uint64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Byte sequence.
    Bytes,
    /// UTF-8 string.
    String,
}

impl Primitive {
    const ALL: [Self; 15] = [
        Self::Bool,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint,
        Self::Int64,
        Self::Uint64,
        Self::Float32,
        Self::Float64,
        Self::Bytes,
        Self::String,
    ];

    /// Returns the short name used in descriptors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int => "int",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint => "uint",
            Self::Int64 => "int64",
            Self::Uint64 => "uint64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bytes => "bytes",
            Self::String => "string",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Time zone handling of a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Zone {
    /// Zone-aware instant (`timestamp with time zone`).
    Local,
    /// UTC wall-clock time stored without a zone.
    Utc,
}

/// When a timestamp is written by the ORM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stamp {
    /// Written by the application.
    Plain,
    /// Set once when the row is inserted.
    Created,
    /// Set on every write.
    Updated,
}

/// Semantic kind of a field, driving SQL type mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldKind {
    /// Database-generated 64-bit identifier key.
    Id,
    /// Non-null primitive value.
    Value(Primitive),
    /// Nullable primitive value.
    Nullable(Primitive),
    /// Timestamp variant.
    Timestamp(Zone, Stamp),
    /// A kind outside the mappable vocabulary, carrying its type name.
    Unsupported(String),
}

impl FieldKind {
    /// Shorthand for `FieldKind::Value(Primitive::String)`.
    pub const STRING: Self = Self::Value(Primitive::String);

    /// Parses a kind name. Unknown names become `Unsupported`.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if let Some(p) = Primitive::parse(name) {
            return Self::Value(p);
        }
        if let Some(p) = name.strip_prefix("nullable_").and_then(Primitive::parse) {
            return Self::Nullable(p);
        }
        match name {
            "id" => Self::Id,
            "timestamp" => Self::Timestamp(Zone::Local, Stamp::Plain),
            "created" => Self::Timestamp(Zone::Local, Stamp::Created),
            "updated" => Self::Timestamp(Zone::Local, Stamp::Updated),
            "timestamp_utc" => Self::Timestamp(Zone::Utc, Stamp::Plain),
            "created_utc" => Self::Timestamp(Zone::Utc, Stamp::Created),
            "updated_utc" => Self::Timestamp(Zone::Utc, Stamp::Updated),
            other => Self::Unsupported(other.to_string()),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => f.write_str("id"),
            Self::Value(p) => f.write_str(p.as_str()),
            Self::Nullable(p) => write!(f, "nullable_{}", p.as_str()),
            Self::Timestamp(zone, stamp) => {
                let base = match stamp {
                    Stamp::Plain => "timestamp",
                    Stamp::Created => "created",
                    Stamp::Updated => "updated",
                };
                match zone {
                    Zone::Local => f.write_str(base),
                    Zone::Utc => write!(f, "{base}_utc"),
                }
            }
            Self::Unsupported(name) => f.write_str(name),
        }
    }
}

impl From<String> for FieldKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<&str> for FieldKind {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}

impl From<FieldKind> for String {
    fn from(kind: FieldKind) -> Self {
        kind.to_string()
    }
}

/// One column of a model: name, semantic kind and current value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Semantic kind.
    pub kind: FieldKind,
    /// Current value.
    #[serde(default)]
    pub value: SqlValue,
    /// Size hint for bounded types; 0 means unbounded.
    #[serde(default)]
    pub size: usize,
    /// Whether the column rejects NULL.
    #[serde(default)]
    pub not_null: bool,
    /// Raw SQL default expression.
    #[serde(default)]
    pub default: Option<String>,
}

impl Field {
    /// Creates a field from explicit parts.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind, value: SqlValue) -> Self {
        Self {
            name: name.into(),
            kind,
            value,
            size: 0,
            not_null: false,
            default: None,
        }
    }

    /// Creates a field whose kind and value come from a Rust value.
    #[must_use]
    pub fn of<T: FieldType + ?Sized>(name: impl Into<String>, value: &T) -> Self {
        Self::new(name, T::field_kind(), value.to_sql_value())
    }

    /// Sets the size hint.
    #[must_use]
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Marks the column NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Sets a raw SQL default expression.
    #[must_use]
    pub fn default(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(expr.into());
        self
    }
}

/// Rust types that can back a model field.
pub trait FieldType {
    /// The semantic kind of the type.
    fn field_kind() -> FieldKind;

    /// Converts the current value for binding.
    fn to_sql_value(&self) -> SqlValue;
}

macro_rules! impl_field_type {
    ($($ty:ty => $prim:ident, |$v:ident| $conv:expr;)+) => {
        $(
            impl FieldType for $ty {
                fn field_kind() -> FieldKind {
                    FieldKind::Value(Primitive::$prim)
                }

                fn to_sql_value(&self) -> SqlValue {
                    let $v = self;
                    $conv
                }
            }
        )+
    };
}

impl_field_type! {
    bool => Bool, |v| SqlValue::Bool(*v);
    i8 => Int8, |v| SqlValue::Int(i64::from(*v));
    i16 => Int16, |v| SqlValue::Int(i64::from(*v));
    i32 => Int32, |v| SqlValue::Int(i64::from(*v));
    isize => Int, |v| int_or_text(i64::try_from(*v), v);
    u8 => Uint8, |v| SqlValue::Int(i64::from(*v));
    u16 => Uint16, |v| SqlValue::Int(i64::from(*v));
    u32 => Uint32, |v| SqlValue::Int(i64::from(*v));
    usize => Uint, |v| int_or_text(i64::try_from(*v), v);
    i64 => Int64, |v| SqlValue::Int(*v);
    u64 => Uint64, |v| int_or_text(i64::try_from(*v), v);
    f32 => Float32, |v| SqlValue::Float(f64::from(*v));
    f64 => Float64, |v| SqlValue::Float(*v);
    String => String, |v| SqlValue::Text(v.clone());
    str => String, |v| SqlValue::Text(v.to_string());
    Vec<u8> => Bytes, |v| SqlValue::Blob(v.clone());
    [u8] => Bytes, |v| SqlValue::Blob(v.to_vec());
}

// Unsigned values above i64::MAX have no signed 64-bit form; the backend
// rejects the text fallback instead of storing a wrapped number.
fn int_or_text<E>(converted: Result<i64, E>, original: &impl fmt::Display) -> SqlValue {
    converted.map_or_else(|_| SqlValue::Text(original.to_string()), SqlValue::Int)
}

impl<T: FieldType> FieldType for Option<T> {
    fn field_kind() -> FieldKind {
        match T::field_kind() {
            FieldKind::Value(p) => FieldKind::Nullable(p),
            other => FieldKind::Unsupported(format!("Option<{other}>")),
        }
    }

    fn to_sql_value(&self) -> SqlValue {
        self.as_ref().map_or(SqlValue::Null, FieldType::to_sql_value)
    }
}

impl<T: FieldType + ?Sized> FieldType for &T {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn to_sql_value(&self) -> SqlValue {
        (**self).to_sql_value()
    }
}

impl<T: FieldType + ?Sized> FieldType for Box<T> {
    fn field_kind() -> FieldKind {
        T::field_kind()
    }

    fn to_sql_value(&self) -> SqlValue {
        (**self).to_sql_value()
    }
}

impl FieldType for DateTime<Utc> {
    fn field_kind() -> FieldKind {
        FieldKind::Timestamp(Zone::Local, Stamp::Plain)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(*self)
    }
}

impl FieldType for DateTime<Local> {
    fn field_kind() -> FieldKind {
        FieldKind::Timestamp(Zone::Local, Stamp::Plain)
    }

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Timestamp(self.with_timezone(&Utc))
    }
}

/// Database-generated primary key. Zero means "not assigned yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Id(pub i64);

impl Id {
    /// Returns whether the backend has assigned this key.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

impl From<i64> for Id {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FieldType for Id {
    fn field_kind() -> FieldKind {
        FieldKind::Id
    }

    fn to_sql_value(&self) -> SqlValue {
        if self.is_assigned() {
            SqlValue::Int(self.0)
        } else {
            SqlValue::Null
        }
    }
}

macro_rules! stamp_types {
    ($($(#[$doc:meta])* $name:ident($inner:ty) => $zone:ident, $stamp:ident, $variant:ident;)+) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
            pub struct $name(pub $inner);

            impl FieldType for $name {
                fn field_kind() -> FieldKind {
                    FieldKind::Timestamp(Zone::$zone, Stamp::$stamp)
                }

                fn to_sql_value(&self) -> SqlValue {
                    SqlValue::$variant(self.0)
                }
            }
        )+
    };
}

stamp_types! {
    /// Zone-aware timestamp set when the row is inserted.
    Created(DateTime<Utc>) => Local, Created, Timestamp;
    /// Zone-aware timestamp set on every write.
    Updated(DateTime<Utc>) => Local, Updated, Timestamp;
    /// UTC wall-clock timestamp.
    TimeUtc(NaiveDateTime) => Utc, Plain, NaiveTimestamp;
    /// UTC wall-clock timestamp set when the row is inserted.
    CreatedUtc(NaiveDateTime) => Utc, Created, NaiveTimestamp;
    /// UTC wall-clock timestamp set on every write.
    UpdatedUtc(NaiveDateTime) => Utc, Updated, NaiveTimestamp;
}

impl Created {
    /// Current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl Updated {
    /// Current time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl TimeUtc {
    /// Current UTC wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc())
    }
}

impl CreatedUtc {
    /// Current UTC wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc())
    }
}

impl UpdatedUtc {
    /// Current UTC wall-clock time.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now().naive_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        let kinds = [
            FieldKind::Id,
            FieldKind::Value(Primitive::Uint16),
            FieldKind::Nullable(Primitive::Float64),
            FieldKind::Timestamp(Zone::Local, Stamp::Plain),
            FieldKind::Timestamp(Zone::Utc, Stamp::Updated),
        ];
        for kind in kinds {
            assert_eq!(FieldKind::parse(&kind.to_string()), kind);
        }
    }

    #[test]
    fn test_unknown_kind_is_unsupported() {
        assert_eq!(
            FieldKind::parse("uuid"),
            FieldKind::Unsupported("uuid".to_string())
        );
        assert_eq!(FieldKind::parse("nullable_json").to_string(), "nullable_json");
    }

    #[test]
    fn test_rust_types_map_to_kinds() {
        assert_eq!(<i32 as FieldType>::field_kind(), FieldKind::Value(Primitive::Int32));
        assert_eq!(<u64 as FieldType>::field_kind(), FieldKind::Value(Primitive::Uint64));
        assert_eq!(<String as FieldType>::field_kind(), FieldKind::STRING);
        assert_eq!(
            <Option<bool> as FieldType>::field_kind(),
            FieldKind::Nullable(Primitive::Bool)
        );
        assert_eq!(<Id as FieldType>::field_kind(), FieldKind::Id);
        assert_eq!(
            <CreatedUtc as FieldType>::field_kind(),
            FieldKind::Timestamp(Zone::Utc, Stamp::Created)
        );
    }

    #[test]
    fn test_optional_non_primitive_is_unsupported() {
        assert_eq!(
            <Option<Id> as FieldType>::field_kind(),
            FieldKind::Unsupported("Option<id>".to_string())
        );
    }

    #[test]
    fn test_values() {
        assert_eq!(Id(0).to_sql_value(), SqlValue::Null);
        assert_eq!(Id(7).to_sql_value(), SqlValue::Int(7));
        assert_eq!(None::<i32>.to_sql_value(), SqlValue::Null);
        assert_eq!(Some(3_u8).to_sql_value(), SqlValue::Int(3));
        assert_eq!(u64::MAX.to_sql_value(), SqlValue::Text(u64::MAX.to_string()));
    }

    #[test]
    fn test_field_builder() {
        let field = Field::of("email", &String::from("a@b.c"))
            .size(255)
            .not_null()
            .default("''");
        assert_eq!(field.kind, FieldKind::STRING);
        assert_eq!(field.value, SqlValue::Text("a@b.c".to_string()));
        assert_eq!(field.size, 255);
        assert!(field.not_null);
        assert_eq!(field.default.as_deref(), Some("''"));
    }

    #[test]
    fn test_field_kind_serde_uses_names() {
        let json = serde_json::to_string(&FieldKind::Nullable(Primitive::Int64)).unwrap();
        assert_eq!(json, "\"nullable_int64\"");
        let kind: FieldKind = serde_json::from_str("\"created_utc\"").unwrap();
        assert_eq!(kind, FieldKind::Timestamp(Zone::Utc, Stamp::Created));
    }
}
