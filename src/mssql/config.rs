use async_trait::async_trait;
use tiberius::{AuthMethod, Config as TiberiusConfig};
use tokio::net::TcpStream;
use tokio_util::compat::Compat;

use super::connection::MssqlConnection;
use crate::backend::{Backend, Connection};
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// Type alias for a SQL Server client on a tokio TCP stream.
pub type MssqlClient = tiberius::Client<Compat<TcpStream>>;

/// SQL Server backend using SQL authentication.
#[derive(Debug, Clone)]
pub struct MssqlBackend {
    config: TiberiusConfig,
    named_instance: bool,
}

impl MssqlBackend {
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if the descriptor is not a complete SQL Server one.
    pub fn new(descriptor: &ConnectionDescriptor) -> Result<Self, SqlRowmapError> {
        if descriptor.kind() != DatabaseType::Mssql {
            return Err(SqlRowmapError::ConfigError(format!(
                "expected a SQL Server descriptor, got {}",
                descriptor.kind()
            )));
        }
        descriptor.validate()?;
        Ok(Self {
            config: build_tiberius_config(descriptor),
            named_instance: descriptor.instance_name().is_some(),
        })
    }

    #[must_use]
    pub fn config(&self) -> &TiberiusConfig {
        &self.config
    }
}

fn build_tiberius_config(descriptor: &ConnectionDescriptor) -> TiberiusConfig {
    let mut config = TiberiusConfig::new();
    config.host(descriptor.host());
    config.database(descriptor.database());
    config.port(descriptor.effective_port().unwrap_or(1433));
    config.authentication(AuthMethod::sql_server(
        descriptor.user(),
        descriptor.password(),
    ));
    if let Some(instance) = descriptor.instance_name() {
        config.instance_name(instance);
    }
    if descriptor.trust_cert() {
        config.trust_cert();
    }
    config
}

#[async_trait]
impl Backend for MssqlBackend {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Mssql
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        let conn = MssqlConnection::connect(self.config.clone(), self.named_instance).await?;
        Ok(Box::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_uses_default_port() {
        let descriptor = ConnectionDescriptor::builder(DatabaseType::Mssql)
            .host("localhost")
            .database("devdb")
            .user("sa")
            .password("secret")
            .build()
            .unwrap();
        let backend = MssqlBackend::new(&descriptor).unwrap();
        assert_eq!(backend.config().get_addr(), "localhost:1433");
    }
}
