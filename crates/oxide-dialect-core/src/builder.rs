//! Shared statement-building helpers used by every dialect.
//!
//! These functions know nothing about a particular backend. Quoting and
//! placeholder markers are delegated back to the dialect passed in.

use crate::dialect::Dialect;
use crate::model::Model;
use crate::value::SqlValue;

/// Column names, placeholder markers and bound values for one row.
///
/// The three vectors always have the same length and order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowParts {
    /// Unquoted column names.
    pub columns: Vec<String>,
    /// Placeholder markers, one per column.
    pub markers: Vec<String>,
    /// Values to bind, one per marker.
    pub values: Vec<SqlValue>,
}

/// Collects the insertable columns of a model in field order.
///
/// Every field takes part except a primary key whose value is NULL: that
/// key is left to the backend to generate. `pos` is the number of markers
/// already emitted in the statement and is advanced for each column.
pub fn columns_markers_and_values<D: Dialect + ?Sized>(
    dialect: &D,
    model: &Model,
    pos: &mut usize,
) -> RowParts {
    let mut parts = RowParts {
        columns: Vec::with_capacity(model.fields.len()),
        markers: Vec::with_capacity(model.fields.len()),
        values: Vec::with_capacity(model.fields.len()),
    };

    for field in &model.fields {
        if model.is_pk(field) && field.value.is_null() {
            continue;
        }
        parts.columns.push(field.name.clone());
        parts.markers.push(dialect.next_marker(pos));
        parts.values.push(field.value.clone());
    }

    parts
}

/// Quotes each name and joins them with `", "`.
pub fn quote_joined<D, S>(dialect: &D, names: &[S]) -> String
where
    D: Dialect + ?Sized,
    S: AsRef<str>,
{
    names
        .iter()
        .map(|n| dialect.quote(n.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}
