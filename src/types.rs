use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::SqlRowmapError;
use crate::translation::PlaceholderStyle;

/// Values read from a result column or bound as a statement parameter.
///
/// Every backend converts its native column types into this enum, and the record mapper
/// converts from it into record fields:
/// ```rust
/// use sql_rowmap::prelude::*;
///
/// let params = vec![
///     Parameter::new("@id", 1),
///     Parameter::new("@name", "alice"),
///     Parameter::new("@active", true),
/// ];
/// assert_eq!(params[1].value, RowValues::Text("alice".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt);
                }
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Short name of the variant, used in mapping error messages.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            RowValues::Int(_) => "int",
            RowValues::Float(_) => "float",
            RowValues::Text(_) => "text",
            RowValues::Bool(_) => "bool",
            RowValues::Timestamp(_) => "timestamp",
            RowValues::Null => "null",
            RowValues::JSON(_) => "json",
            RowValues::Blob(_) => "blob",
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// The database backends this crate can talk to.
///
/// Every variant exists in every build; constructing a backend whose cargo feature is
/// disabled fails with [`SqlRowmapError::Unimplemented`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[value(alias = "postgresql")]
    #[serde(alias = "postgresql")]
    Postgres,
    /// SQL Server database
    #[value(alias = "sqlserver")]
    #[serde(alias = "sqlserver")]
    Mssql,
    /// `MySQL` database
    Mysql,
    /// `SQLite` database
    Sqlite,
}

impl DatabaseType {
    /// Parse a backend name such as `postgres` or `MSSQL`.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` for names that match no backend.
    pub fn parse(name: &str) -> Result<Self, SqlRowmapError> {
        <Self as ValueEnum>::from_str(name, true)
            .map_err(|_| SqlRowmapError::ConfigError(format!("unknown database type `{name}`")))
    }

    /// Port used when a descriptor does not set one. `SQLite` has none.
    #[must_use]
    pub fn default_port(self) -> Option<u16> {
        match self {
            DatabaseType::Postgres => Some(5432),
            DatabaseType::Mssql => Some(1433),
            DatabaseType::Mysql => Some(3306),
            DatabaseType::Sqlite => None,
        }
    }

    /// Whether the backend is reached over the network (host, user, password required).
    #[must_use]
    pub fn is_networked(self) -> bool {
        !matches!(self, DatabaseType::Sqlite)
    }

    /// Native placeholder syntax that named parameters are rewritten into.
    #[must_use]
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            DatabaseType::Postgres => PlaceholderStyle::Postgres,
            DatabaseType::Mssql => PlaceholderStyle::Mssql,
            DatabaseType::Mysql => PlaceholderStyle::Mysql,
            DatabaseType::Sqlite => PlaceholderStyle::Sqlite,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DatabaseType::Postgres => "postgres",
            DatabaseType::Mssql => "mssql",
            DatabaseType::Mysql => "mysql",
            DatabaseType::Sqlite => "sqlite",
        };
        f.write_str(name)
    }
}
