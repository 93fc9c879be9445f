//! Mapping result rows onto caller-defined record types.
//!
//! A record type registers, once, which columns feed which fields (a [`FieldMap`]). Mapping
//! a row starts from `T::default()` and assigns every registered field whose column is
//! present and not `NULL`. Columns with no registered field are ignored; fields with no
//! column keep their default.
//!
//! ```rust
//! use sql_rowmap::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Contact {
//!     name: String,
//!     email: String,
//!     address: Option<String>,
//! }
//!
//! sql_rowmap::impl_record!(Contact { name, email, address });
//!
//! let row = DbRow::new(
//!     Arc::new(vec!["name".into(), "email".into(), "phone".into()]),
//!     vec![
//!         RowValues::Text("A".into()),
//!         RowValues::Text("a@x.com".into()),
//!         RowValues::Text("555".into()),
//!     ],
//! );
//! let contact: Contact = map_row(&row)?;
//! assert_eq!(contact.email, "a@x.com");
//! assert_eq!(contact.address, None);
//! # Ok::<(), SqlRowmapError>(())
//! ```

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlRowmapError;
use crate::results::{DbRow, ResultSet};
use crate::types::RowValues;

/// A type that result rows can be mapped onto.
///
/// Implement it with [`impl_record!`](crate::impl_record) or by hand with
/// [`FieldMap::builder`] behind a `LazyLock`.
pub trait Record: Default + Send + 'static {
    /// The column-to-field table for this type, built once.
    fn field_map() -> &'static FieldMap<Self>;
}

type Setter<T> = Box<dyn Fn(&mut T, &RowValues) -> Result<(), SqlRowmapError> + Send + Sync>;

struct FieldBinding<T> {
    column: &'static str,
    set: Setter<T>,
}

/// Column-to-field assignments for one record type.
pub struct FieldMap<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T> FieldMap<T> {
    #[must_use]
    pub fn builder() -> FieldMapBuilder<T> {
        FieldMapBuilder { fields: Vec::new() }
    }

    /// Registered column names, in registration order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> std::fmt::Debug for FieldMap<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.columns()).finish()
    }
}

/// Builder for [`FieldMap`].
pub struct FieldMapBuilder<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T> FieldMapBuilder<T> {
    /// Register `column` as the source of a field. `assign` receives the converted value.
    ///
    /// # Panics
    /// Panics if `column` is already registered; a record type's table is fixed at
    /// registration and a duplicate is a programming error.
    #[must_use]
    pub fn field<V, F>(mut self, column: &'static str, assign: F) -> Self
    where
        V: FromRowValue,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        assert!(
            !self.fields.iter().any(|f| f.column == column),
            "column `{column}` registered twice"
        );
        let set: Setter<T> = Box::new(move |record: &mut T, value: &RowValues| {
            let converted =
                V::from_row_value(value).map_err(|message| SqlRowmapError::field(column, message))?;
            assign(record, converted);
            Ok(())
        });
        self.fields.push(FieldBinding { column, set });
        self
    }

    #[must_use]
    pub fn build(self) -> FieldMap<T> {
        FieldMap {
            fields: self.fields,
        }
    }
}

/// Map one row onto a new `T`.
///
/// # Errors
/// Returns `SqlRowmapError::FieldMappingError` when a column value cannot be converted to
/// its field's type.
pub fn map_row<T: Record>(row: &DbRow) -> Result<T, SqlRowmapError> {
    let mut record = T::default();
    for binding in &T::field_map().fields {
        match row.get(binding.column) {
            None | Some(RowValues::Null) => {}
            Some(value) => (binding.set)(&mut record, value)?,
        }
    }
    Ok(record)
}

/// Map every row of a result set, preserving row order.
///
/// # Errors
/// Returns the first `SqlRowmapError::FieldMappingError` encountered.
pub fn map_result_set<T: Record>(result_set: &ResultSet) -> Result<Vec<T>, SqlRowmapError> {
    result_set.results.iter().map(map_row::<T>).collect()
}

/// Conversion from a column value into a field type.
///
/// | Field type | Accepted values |
/// |---|---|
/// | `i64` | `Int` |
/// | `i32`, `i16`, `u32`, `u64`, `usize` | `Int` within range |
/// | `f64`, `f32` | `Float`, `Int` |
/// | `String` | `Text` |
/// | `bool` | `Bool`, `Int` 0 or 1 |
/// | `NaiveDateTime` | `Timestamp`, `Text` as `YYYY-MM-DD HH:MM:SS[.f]` (space or `T`) |
/// | `serde_json::Value` | `JSON`, `Text` holding JSON |
/// | `Vec<u8>` | `Blob` |
/// | `Option<T>` | `Null` as `None`, otherwise as `T` |
/// | `RowValues` | anything |
pub trait FromRowValue: Sized {
    /// # Errors
    /// Returns a description of the mismatch.
    fn from_row_value(value: &RowValues) -> Result<Self, String>;
}

fn mismatch(expected: &str, value: &RowValues) -> String {
    format!("expected {expected}, found {}", value.type_name())
}

impl FromRowValue for i64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_int().copied().ok_or_else(|| mismatch("int", value))
    }
}

macro_rules! from_row_value_narrow_int {
    ($($int:ty),*) => {
        $(
            impl FromRowValue for $int {
                fn from_row_value(value: &RowValues) -> Result<Self, String> {
                    let wide = value.as_int().ok_or_else(|| mismatch("int", value))?;
                    <$int>::try_from(*wide).map_err(|_| {
                        format!("{wide} is out of range for {}", stringify!($int))
                    })
                }
            }
        )*
    };
}

from_row_value_narrow_int!(i32, i16, u32, u64, usize);

impl FromRowValue for f64 {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl FromRowValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        f64::from_row_value(value).map(|f| f as f32)
    }
}

impl FromRowValue for String {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_text()
            .map(str::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl FromRowValue for bool {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value.as_bool().copied().ok_or_else(|| mismatch("bool", value))
    }
}

impl FromRowValue for NaiveDateTime {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch("timestamp", value))
    }
}

impl FromRowValue for JsonValue {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::JSON(json) => Ok(json.clone()),
            RowValues::Text(text) => {
                serde_json::from_str(text).map_err(|e| format!("text is not valid JSON: {e}"))
            }
            other => Err(mismatch("json", other)),
        }
    }
}

impl FromRowValue for Vec<u8> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        value
            .as_blob()
            .map(<[u8]>::to_vec)
            .ok_or_else(|| mismatch("blob", value))
    }
}

impl<T: FromRowValue> FromRowValue for Option<T> {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        match value {
            RowValues::Null => Ok(None),
            other => T::from_row_value(other).map(Some),
        }
    }
}

impl FromRowValue for RowValues {
    fn from_row_value(value: &RowValues) -> Result<Self, String> {
        Ok(value.clone())
    }
}

/// Implement [`Record`](crate::mapper::Record) for a struct with named fields.
///
/// Each listed field is filled from the column of the same name; `field => "column"`
/// reads from a differently named column. The struct must implement `Default`, and every
/// listed field type must implement [`FromRowValue`](crate::mapper::FromRowValue).
///
/// ```rust
/// #[derive(Default)]
/// struct Account {
///     id: i64,
///     display_name: String,
/// }
///
/// sql_rowmap::impl_record!(Account { id, display_name => "name" });
/// ```
#[macro_export]
macro_rules! impl_record {
    (@column $field:ident) => {
        stringify!($field)
    };
    (@column $field:ident => $column:literal) => {
        $column
    };
    ($ty:ty { $($field:ident $(=> $column:literal)?),* $(,)? }) => {
        impl $crate::mapper::Record for $ty {
            fn field_map() -> &'static $crate::mapper::FieldMap<Self> {
                static FIELD_MAP: ::std::sync::LazyLock<$crate::mapper::FieldMap<$ty>> =
                    ::std::sync::LazyLock::new(|| {
                        $crate::mapper::FieldMap::builder()
                            $(
                                .field(
                                    $crate::impl_record!(@column $field $(=> $column)?),
                                    |record: &mut $ty, value| record.$field = value,
                                )
                            )*
                            .build()
                    });
                &FIELD_MAP
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, LazyLock};

    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Contact {
        name: String,
        email: String,
        address: Option<String>,
        age: i32,
    }

    crate::impl_record!(Contact {
        name,
        email,
        address,
        age,
    });

    #[derive(Debug, Default)]
    struct Renamed {
        id: u64,
        active: bool,
        payload: JsonValue,
    }

    crate::impl_record!(Renamed { id => "user_id", active, payload });

    fn row(columns: &[&str], values: Vec<RowValues>) -> DbRow {
        DbRow::new(
            Arc::new(columns.iter().map(|c| (*c).to_string()).collect()),
            values,
        )
    }

    #[test]
    fn maps_fields_present_in_both() {
        let r = row(
            &["name", "email", "extra"],
            vec![
                RowValues::Text("A".into()),
                RowValues::Text("a@x.com".into()),
                RowValues::Int(9),
            ],
        );
        let contact: Contact = map_row(&r).unwrap();
        assert_eq!(
            contact,
            Contact {
                name: "A".into(),
                email: "a@x.com".into(),
                address: None,
                age: 0,
            }
        );
    }

    #[test]
    fn null_leaves_default() {
        let r = row(
            &["name", "address", "age"],
            vec![RowValues::Null, RowValues::Null, RowValues::Int(41)],
        );
        let contact: Contact = map_row(&r).unwrap();
        assert_eq!(contact.name, "");
        assert_eq!(contact.address, None);
        assert_eq!(contact.age, 41);
    }

    #[test]
    fn column_match_is_case_sensitive() {
        let r = row(&["Name"], vec![RowValues::Text("A".into())]);
        let contact: Contact = map_row(&r).unwrap();
        assert_eq!(contact.name, "");
    }

    #[test]
    fn renamed_column_and_coercions() {
        let r = row(
            &["user_id", "active", "payload"],
            vec![
                RowValues::Int(12),
                RowValues::Int(1),
                RowValues::Text("{\"k\":1}".into()),
            ],
        );
        let rec: Renamed = map_row(&r).unwrap();
        assert_eq!(rec.id, 12);
        assert!(rec.active);
        assert_eq!(rec.payload["k"], 1);
    }

    #[test]
    fn type_mismatch_names_the_field() {
        let r = row(&["age"], vec![RowValues::Text("forty".into())]);
        let err = map_row::<Contact>(&r).unwrap_err();
        match err {
            SqlRowmapError::FieldMappingError { field, message } => {
                assert_eq!(field, "age");
                assert_eq!(message, "expected int, found text");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        let r = row(&["user_id"], vec![RowValues::Int(-1)]);
        assert!(matches!(
            map_row::<Renamed>(&r),
            Err(SqlRowmapError::FieldMappingError { .. })
        ));
    }

    #[test]
    fn hand_built_field_map() {
        #[derive(Default)]
        struct Pair {
            left: f64,
            right: Option<NaiveDateTime>,
        }

        impl Record for Pair {
            fn field_map() -> &'static FieldMap<Self> {
                static MAP: LazyLock<FieldMap<Pair>> = LazyLock::new(|| {
                    FieldMap::builder()
                        .field("l", |p: &mut Pair, v: f64| p.left = v)
                        .field("r", |p: &mut Pair, v| p.right = v)
                        .build()
                });
                &MAP
            }
        }

        assert_eq!(Pair::field_map().columns().collect::<Vec<_>>(), ["l", "r"]);
        let r = row(
            &["l", "r"],
            vec![RowValues::Int(2), RowValues::Text("2024-01-02T03:04:05".into())],
        );
        let pair: Pair = map_row(&r).unwrap();
        assert!((pair.left - 2.0).abs() < f64::EPSILON);
        assert_eq!(pair.right.unwrap().to_string(), "2024-01-02 03:04:05");
    }

    #[test]
    #[should_panic(expected = "registered twice")]
    fn duplicate_registration_panics() {
        let _ = FieldMap::<Contact>::builder()
            .field("name", |c: &mut Contact, v: String| c.name = v)
            .field("name", |c: &mut Contact, v: String| c.email = v);
    }
}
