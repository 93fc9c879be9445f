//! The caller-facing handle: one backend plus the execution options applied to every call.

use crate::backend::Backend;
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::executor::{self, ExecuteOptions};
use crate::factory::create_backend;
use crate::mapper::Record;
use crate::params::Parameter;
use crate::results::QueryOutcome;
use crate::types::DatabaseType;

/// Runs raw SQL against one database and maps result rows onto record types.
///
/// `Database` holds no open connection. Each method opens a connection, runs one statement
/// and closes it again, so a `Database` can be shared freely between tasks.
///
/// ```rust,no_run
/// use sql_rowmap::prelude::*;
///
/// #[derive(Debug, Default)]
/// struct Contact {
///     name: String,
///     email: String,
/// }
/// sql_rowmap::impl_record!(Contact { name, email });
///
/// # async fn demo() -> Result<(), SqlRowmapError> {
/// let db = Database::connect(&ConnectionDescriptor::sqlite("contacts.db")?)?;
/// let found: Vec<Contact> = db
///     .execute(
///         "SELECT * FROM contacts WHERE email = @email",
///         &[Parameter::new("@email", "a@x.com")],
///     )
///     .await?;
/// # let _ = found;
/// # Ok(()) }
/// ```
pub struct Database {
    backend: Box<dyn Backend>,
    options: ExecuteOptions,
}

impl Database {
    /// Build the backend described by `descriptor`. No connection is opened yet.
    ///
    /// # Errors
    /// Returns `ConfigError` for an incomplete descriptor or `Unimplemented` if the backend
    /// kind is not compiled in.
    pub fn connect(descriptor: &ConnectionDescriptor) -> Result<Self, SqlRowmapError> {
        Ok(Self {
            backend: create_backend(descriptor)?,
            options: ExecuteOptions::default(),
        })
    }

    /// Wrap a caller-supplied backend.
    pub fn from_backend(backend: impl Backend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            options: ExecuteOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ExecuteOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn kind(&self) -> DatabaseType {
        self.backend.kind()
    }

    #[must_use]
    pub fn options(&self) -> ExecuteOptions {
        self.options
    }

    /// Run a parameterless query on the read path. The text is not classified; a statement
    /// that returns no rows simply yields an empty vector, and invalid SQL fails in the
    /// backend.
    ///
    /// # Errors
    /// `QueryExecutionError`, `ConnectionError` or `FieldMappingError`.
    pub async fn select<T: Record>(&self, sql: &str) -> Result<Vec<T>, SqlRowmapError> {
        executor::read(self.backend.as_ref(), sql, &[]).await
    }

    /// Classify and run `sql` with named parameters. Reads return their mapped records;
    /// writes return an empty vector.
    ///
    /// # Errors
    /// See [`executor::execute`].
    pub async fn execute<T: Record>(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<Vec<T>, SqlRowmapError> {
        self.query(sql, params).await.map(QueryOutcome::into_records)
    }

    /// Like [`Database::execute`] but keeps the full outcome, including a write's
    /// affected-row count.
    ///
    /// # Errors
    /// See [`executor::execute`].
    pub async fn query<T: Record>(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<QueryOutcome<T>, SqlRowmapError> {
        executor::execute(self.backend.as_ref(), sql, params, self.options).await
    }

    /// Run an `INSERT`, `UPDATE` or `DELETE` and return how many rows it affected.
    ///
    /// # Errors
    /// See [`executor::write`].
    pub async fn execute_write(
        &self,
        sql: &str,
        params: &[Parameter],
    ) -> Result<usize, SqlRowmapError> {
        executor::write(self.backend.as_ref(), sql, params, self.options).await
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("kind", &self.kind())
            .field("options", &self.options)
            .finish()
    }
}
