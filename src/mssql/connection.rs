use async_trait::async_trait;
use tiberius::{Client, Config as TiberiusConfig, SqlBrowser};
use tokio::net::TcpStream;
use tokio_util::compat::TokioAsyncWriteCompatExt;

use super::config::MssqlClient;
use super::params::bind_query_params;
use super::query::build_result_set;
use crate::backend::Connection;
use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One SQL Server session.
pub struct MssqlConnection {
    client: MssqlClient,
}

impl MssqlConnection {
    /// Connect over TCP. Named instances are resolved through the SQL Browser service.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the TCP connection or login fails.
    pub async fn connect(
        config: TiberiusConfig,
        named_instance: bool,
    ) -> Result<Self, SqlRowmapError> {
        let tcp = if named_instance {
            TcpStream::connect_named(&config).await.map_err(|e| {
                SqlRowmapError::ConnectionError(format!("SQL Browser lookup error: {e}"))
            })?
        } else {
            TcpStream::connect(config.get_addr()).await.map_err(|e| {
                SqlRowmapError::ConnectionError(format!("TCP connection error: {e}"))
            })?
        };
        tcp.set_nodelay(true).map_err(|e| {
            SqlRowmapError::ConnectionError(format!("TCP configuration error: {e}"))
        })?;

        let client = Client::connect(config, tcp.compat_write())
            .await
            .map_err(|e| {
                SqlRowmapError::ConnectionError(format!("SQL Server connection error: {e}"))
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Connection for MssqlConnection {
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError> {
        build_result_set(&mut self.client, sql, params).await
    }

    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError> {
        let query_builder = bind_query_params(sql, params);
        let result = query_builder
            .execute(&mut self.client)
            .await
            .map_err(|e| SqlRowmapError::execution("SQL Server execute error", e))?;
        let total: u64 = result.rows_affected().iter().sum();
        usize::try_from(total)
            .map_err(|e| SqlRowmapError::execution("SQL Server affected rows exceed usize", e))
    }

    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError> {
        self.client.close().await.map_err(|e| {
            SqlRowmapError::ConnectionError(format!("SQL Server close error: {e}"))
        })
    }
}
