use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config as PgConfig, NoTls};

use super::params::Params;
use super::query::build_result_set_from_statement;
use crate::backend::Connection;
use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// One `PostgreSQL` session. The socket is driven by a spawned task that ends once the
/// client is dropped.
pub struct PostgresConnection {
    client: Client,
    driver: JoinHandle<Result<(), tokio_postgres::Error>>,
}

impl PostgresConnection {
    /// # Errors
    /// Returns `SqlRowmapError::ConnectionError` if the server cannot be reached or rejects
    /// the login.
    pub async fn connect(config: &PgConfig) -> Result<Self, SqlRowmapError> {
        let (client, connection) = config.connect(NoTls).await.map_err(|e| {
            SqlRowmapError::ConnectionError(format!("postgres connection error: {e}"))
        })?;
        let driver = tokio::spawn(connection);
        Ok(Self { client, driver })
    }

    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl Connection for PostgresConnection {
    async fn query(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ResultSet, SqlRowmapError> {
        let stmt = self.client.prepare(sql).await?;
        let converted = Params::convert(params);
        let rows = self.client.query(&stmt, converted.as_refs()).await?;
        build_result_set_from_statement(&stmt, &rows)
    }

    async fn execute(&mut self, sql: &str, params: &[RowValues]) -> Result<usize, SqlRowmapError> {
        let converted = Params::convert(params);
        let rows = self.client.execute(sql, converted.as_refs()).await?;
        usize::try_from(rows).map_err(|e| {
            SqlRowmapError::execution("postgres affected rows exceed usize", e)
        })
    }

    async fn close(self: Box<Self>) -> Result<(), SqlRowmapError> {
        let PostgresConnection { client, driver } = *self;
        drop(client);
        match driver.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(SqlRowmapError::ConnectionError(format!(
                "postgres connection closed with error: {e}"
            ))),
            Err(e) => Err(SqlRowmapError::ConnectionError(format!(
                "postgres driver task failed: {e}"
            ))),
        }
    }
}
