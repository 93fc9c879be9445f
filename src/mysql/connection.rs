use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection as _, Executor, Statement};

use super::params::bind_query_params;
use super::query::{build_result_set, column_names};
use crate::backend::Connection;
use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One `MySQL` session.
pub struct MysqlConnection {
    conn: MySqlConnection,
}

impl MysqlConnection {
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the server cannot be reached or rejects
    /// the login.
    pub async fn connect(options: &MySqlConnectOptions) -> Result<Self, SqlRowmapError> {
        let conn = MySqlConnection::connect_with(options)
            .await
            .map_err(|e| SqlRowmapError::ConnectionError(format!("mysql connection error: {e}")))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Connection for MysqlConnection {
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError> {
        let stmt = Executor::prepare(&mut self.conn, sql).await?;
        let names = column_names(stmt.columns());
        let rows = bind_query_params(stmt.query(), params)
            .fetch_all(&mut self.conn)
            .await?;
        build_result_set(names, &rows)
    }

    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError> {
        let result = bind_query_params(sqlx::query(sql), params)
            .execute(&mut self.conn)
            .await?;
        usize::try_from(result.rows_affected())
            .map_err(|e| SqlRowmapError::execution("mysql affected rows exceed usize", e))
    }

    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError> {
        self.conn
            .close()
            .await
            .map_err(|e| SqlRowmapError::ConnectionError(format!("mysql close error: {e}")))
    }
}
