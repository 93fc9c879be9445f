//! Run raw SQL against PostgreSQL, SQL Server, MySQL or SQLite and map the result rows onto
//! your own record types.
//!
//! A [`Database`] wraps one backend. Each call opens a connection, binds `@name`
//! parameters into the backend's placeholder syntax, runs the statement and closes the
//! connection before returning. `SELECT` statements produce records; `INSERT`, `UPDATE`
//! and `DELETE` produce an affected-row count.
//!
//! ```rust,no_run
//! use sql_rowmap::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Contact {
//!     name: String,
//!     address: Option<String>,
//!     email: String,
//! }
//! sql_rowmap::impl_record!(Contact { name, address, email });
//!
//! # async fn demo() -> Result<(), SqlRowmapError> {
//! let descriptor = ConnectionDescriptor::builder(DatabaseType::Postgres)
//!     .host("localhost")
//!     .database("app")
//!     .user("app")
//!     .password("secret")
//!     .build()?;
//! let db = Database::connect(&descriptor)?;
//!
//! db.execute_write(
//!     "INSERT INTO contacts (name, address, email) VALUES (@name, @address, @email)",
//!     &[
//!         Parameter::new("@email", "a@x.com"),
//!         Parameter::new("@name", "A"),
//!         Parameter::null("@address"),
//!     ],
//! )
//! .await?;
//!
//! let contacts: Vec<Contact> = db.select("SELECT * FROM contacts").await?;
//! # let _ = contacts;
//! # Ok(()) }
//! ```

pub mod backend;
pub mod database;
pub mod descriptor;
pub mod error;
pub mod executor;
pub mod factory;
pub mod mapper;
pub mod params;
pub mod prelude;
pub mod results;
pub mod statement;
pub mod translation;
pub mod types;

#[cfg(feature = "mssql")]
pub mod mssql;
#[cfg(feature = "mysql")]
pub mod mysql;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use backend::{Backend, Connection};
pub use database::Database;
pub use descriptor::{ConnectionDescriptor, ConnectionDescriptorBuilder};
pub use error::SqlRowmapError;
pub use executor::ExecuteOptions;
pub use factory::create_backend;
pub use mapper::{FieldMap, FieldMapBuilder, FromRowValue, Record, map_result_set, map_row};
pub use params::Parameter;
pub use results::{DbRow, QueryOutcome, ResultSet};
pub use statement::{StatementKind, classify};
pub use translation::{BoundStatement, PlaceholderStyle, bind_named_parameters};
pub use types::{DatabaseType, RowValues};
