use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::params::Params;
use super::query::build_result_set;
use crate::backend::Connection;
use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// An open `SQLite` connection. rusqlite blocks, so every operation runs on tokio's
/// blocking pool.
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
    path: PathBuf,
}

impl SqliteConnection {
    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the file cannot be opened.
    pub async fn open(path: PathBuf) -> Result<Self, SqlRowmapError> {
        let open_path = path.clone();
        let conn = tokio::task::spawn_blocking(move || rusqlite::Connection::open(open_path))
            .await
            .map_err(|e| {
                SqlRowmapError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
            })?
            .map_err(|e| {
                SqlRowmapError::ConnectionError(format!(
                    "failed to open sqlite database {}: {e}",
                    path.display()
                ))
            })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Run `func` against the raw rusqlite connection on a blocking thread.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `QueryExecutionError` if the blocking task fails.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, SqlRowmapError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlRowmapError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

async fn run_blocking<F, R>(conn: SharedSqliteConnection, func: F) -> Result<R, SqlRowmapError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlRowmapError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| SqlRowmapError::execution("sqlite spawn_blocking join error", e))?
}

#[async_trait]
impl Connection for SqliteConnection {
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError> {
        let sql = sql.to_owned();
        let params = Params::convert(params);
        self.with_connection(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            build_result_set(&mut stmt, &params)
        })
        .await
    }

    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError> {
        let sql = sql.to_owned();
        let params = Params::convert(params);
        self.with_connection(move |conn| {
            let param_refs = params.as_refs();
            Ok(conn.execute(&sql, &param_refs[..])?)
        })
        .await
    }

    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError> {
        let SqliteConnection { conn, path } = *self;
        let conn = Arc::try_unwrap(conn)
            .map_err(|_| {
                SqlRowmapError::ConnectionError(format!(
                    "sqlite connection to {} is still in use",
                    path.display()
                ))
            })?
            .into_inner();
        tokio::task::spawn_blocking(move || conn.close())
            .await
            .map_err(|e| {
                SqlRowmapError::ConnectionError(format!("sqlite spawn_blocking join error: {e}"))
            })?
            .map_err(|(_, e)| {
                SqlRowmapError::ConnectionError(format!("failed to close sqlite connection: {e}"))
            })
    }
}
