//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::backend::{Backend, Connection};
pub use crate::database::Database;
pub use crate::descriptor::{ConnectionDescriptor, ConnectionDescriptorBuilder};
pub use crate::error::SqlRowmapError;
pub use crate::executor::ExecuteOptions;
pub use crate::factory::create_backend;
pub use crate::mapper::{FieldMap, FieldMapBuilder, FromRowValue, Record, map_result_set, map_row};
pub use crate::params::Parameter;
pub use crate::results::{DbRow, QueryOutcome, ResultSet};
pub use crate::statement::{StatementKind, classify};
pub use crate::translation::{BoundStatement, PlaceholderStyle, bind_named_parameters};
pub use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "mssql")]
pub use crate::mssql::MssqlBackend;
#[cfg(feature = "mysql")]
pub use crate::mysql::MysqlBackend;
#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresBackend;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteBackend;
