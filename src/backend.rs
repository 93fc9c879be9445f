//! The capability set every database backend provides.

use async_trait::async_trait;

use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::translation::PlaceholderStyle;
use crate::types::{DatabaseType, RowValues};

/// A database backend: knows its identity and how to open a connection.
///
/// A backend holds no open connection between calls; the executor opens one per call and
/// closes it before returning.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Which kind of database this backend talks to.
    fn kind(&self) -> DatabaseType;

    /// Placeholder syntax that named parameters are rewritten into.
    fn placeholder_style(&self) -> PlaceholderStyle {
        self.kind().placeholder_style()
    }

    /// Open a fresh connection.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the database cannot be reached.
    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError>;
}

/// One open connection. SQL and values arrive already in the backend's placeholder style.
#[async_trait]
pub trait Connection: Send {
    /// Run a statement that produces rows.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::QueryExecutionError` if the backend rejects the statement.
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError>;

    /// Run a statement that produces an affected-row count.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::QueryExecutionError` if the backend rejects the statement.
    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError>;

    /// Close the connection and release its resources.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the backend reports a failure while
    /// shutting the connection down.
    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError>;
}

#[async_trait]
impl<B: Backend + ?Sized> Backend for Box<B> {
    fn kind(&self) -> DatabaseType {
        (**self).kind()
    }

    fn placeholder_style(&self) -> PlaceholderStyle {
        (**self).placeholder_style()
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        (**self).open().await
    }
}
