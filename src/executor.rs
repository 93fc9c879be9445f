//! Runs one statement against a backend: classify, bind, open, execute, map, close.
//!
//! Every call opens exactly one connection and closes it exactly once, whether the
//! statement succeeded or failed. Classification and parameter binding happen before the
//! connection is opened, so a statement that cannot run never touches the database.

use tracing::{debug, warn};

use crate::backend::{Backend, Connection};
use crate::error::SqlRowmapError;
use crate::mapper::{Record, map_result_set};
use crate::params::Parameter;
use crate::results::QueryOutcome;
use crate::statement::{StatementKind, classify};
use crate::translation::{BoundStatement, bind_named_parameters};

/// Per-call policy knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteOptions {
    /// Fail a write that affects no rows with `SqlRowmapError::NoRowsAffected`.
    pub require_affected_rows: bool,
}

impl ExecuteOptions {
    #[must_use]
    pub fn require_affected_rows(mut self, require: bool) -> Self {
        self.require_affected_rows = require;
        self
    }
}

/// Classify `sql` and run it on a fresh connection.
///
/// `SELECT` statements map every returned row onto `T`, in the order the backend produced
/// them. `INSERT`, `UPDATE` and `DELETE` report their affected-row count.
///
/// # Errors
/// - `UnsupportedStatementKind` if `sql` does not start with a recognized keyword (no
///   connection is opened);
/// - `ParameterError` if the placeholders and `params` disagree (no connection is opened);
/// - `ConnectionError` if the connection cannot be opened or closed;
/// - `QueryExecutionError` if the backend rejects the statement;
/// - `FieldMappingError` if a column cannot be converted into its field;
/// - `NoRowsAffected` for a zero-row write when `options.require_affected_rows` is set.
pub async fn execute<T, B>(
    backend: &B,
    sql: &str,
    params: &[Parameter],
    options: ExecuteOptions,
) -> Result<QueryOutcome<T>, SqlRowmapError>
where
    T: Record,
    B: Backend + ?Sized,
{
    match classify(sql)? {
        StatementKind::Read => read(backend, sql, params).await.map(QueryOutcome::Read),
        StatementKind::Write => write_unchecked(backend, sql, params, options)
            .await
            .map(QueryOutcome::Write),
    }
}

/// Run `sql` on the read path without classifying it; the backend decides whether the text
/// is valid.
///
/// # Errors
/// As [`execute`], minus classification and the affected-rows check.
pub async fn read<T, B>(
    backend: &B,
    sql: &str,
    params: &[Parameter],
) -> Result<Vec<T>, SqlRowmapError>
where
    T: Record,
    B: Backend + ?Sized,
{
    let bound = bind_named_parameters(sql, params, backend.placeholder_style())?;
    let mut conn = open(backend).await?;
    let result = read_records::<T>(conn.as_mut(), &bound).await;
    release(conn, result).await
}

/// Run a write statement and return its affected-row count.
///
/// # Errors
/// `UnsupportedStatementKind` if `sql` is not an `INSERT`, `UPDATE` or `DELETE`; otherwise
/// as [`execute`].
pub async fn write<B>(
    backend: &B,
    sql: &str,
    params: &[Parameter],
    options: ExecuteOptions,
) -> Result<usize, SqlRowmapError>
where
    B: Backend + ?Sized,
{
    match classify(sql)? {
        StatementKind::Write => write_unchecked(backend, sql, params, options).await,
        StatementKind::Read => Err(SqlRowmapError::UnsupportedStatementKind(
            "expected an INSERT, UPDATE or DELETE statement, got a SELECT".to_string(),
        )),
    }
}

async fn write_unchecked<B>(
    backend: &B,
    sql: &str,
    params: &[Parameter],
    options: ExecuteOptions,
) -> Result<usize, SqlRowmapError>
where
    B: Backend + ?Sized,
{
    let bound = bind_named_parameters(sql, params, backend.placeholder_style())?;
    let mut conn = open(backend).await?;
    let result = write_rows(conn.as_mut(), &bound, options).await;
    release(conn, result).await
}

async fn open<B>(backend: &B) -> Result<Box<dyn Connection>, SqlRowmapError>
where
    B: Backend + ?Sized,
{
    let conn = backend.open().await?;
    debug!(backend = %backend.kind(), "opened connection");
    Ok(conn)
}

async fn read_records<T: Record>(
    conn: &mut dyn Connection,
    bound: &BoundStatement<'_>,
) -> Result<Vec<T>, SqlRowmapError> {
    let result_set = conn.query(&bound.sql, &bound.values).await?;
    let records = map_result_set::<T>(&result_set)?;
    if records.is_empty() {
        debug!("read matched no rows");
    }
    Ok(records)
}

async fn write_rows(
    conn: &mut dyn Connection,
    bound: &BoundStatement<'_>,
    options: ExecuteOptions,
) -> Result<usize, SqlRowmapError> {
    let affected = conn.execute(&bound.sql, &bound.values).await?;
    if affected == 0 {
        debug!("write affected no rows");
        if options.require_affected_rows {
            return Err(SqlRowmapError::NoRowsAffected(
                "statement completed without changing any row".to_string(),
            ));
        }
    }
    Ok(affected)
}

// The operation's own error wins over a close error.
async fn release<R>(
    conn: Box<dyn Connection>,
    result: Result<R, SqlRowmapError>,
) -> Result<R, SqlRowmapError> {
    let closed = conn.close().await;
    debug!(ok = closed.is_ok(), "closed connection");
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_err)) => Err(close_err),
        (Err(err), Ok(())) => Err(err),
        (Err(err), Err(close_err)) => {
            warn!(error = %close_err, "failed to close connection after a failed statement");
            Err(err)
        }
    }
}
