use async_trait::async_trait;
use tokio_postgres::Config as PgConfig;

use super::connection::PostgresConnection;
use crate::backend::{Backend, Connection};
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// `PostgreSQL` backend over tokio-postgres without TLS.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    config: PgConfig,
}

impl PostgresBackend {
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if the descriptor is not a complete Postgres one.
    pub fn new(descriptor: &ConnectionDescriptor) -> Result<Self, SqlRowmapError> {
        if descriptor.kind() != DatabaseType::Postgres {
            return Err(SqlRowmapError::ConfigError(format!(
                "expected a postgres descriptor, got {}",
                descriptor.kind()
            )));
        }
        descriptor.validate()?;
        Ok(Self {
            config: build_pg_config(descriptor),
        })
    }

    /// Wrap an already-built tokio-postgres config.
    #[must_use]
    pub fn from_config(config: PgConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &PgConfig {
        &self.config
    }
}

fn build_pg_config(descriptor: &ConnectionDescriptor) -> PgConfig {
    let mut config = PgConfig::new();
    config
        .host(descriptor.host())
        .dbname(descriptor.database())
        .user(descriptor.user());
    if let Some(port) = descriptor.effective_port() {
        config.port(port);
    }
    if !descriptor.password().is_empty() {
        config.password(descriptor.password());
    }
    config
}

#[async_trait]
impl Backend for PostgresBackend {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        let conn = PostgresConnection::connect(&self.config).await?;
        Ok(Box::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_fields_reach_the_driver_config() {
        let descriptor = ConnectionDescriptor::builder(DatabaseType::Postgres)
            .host("db.internal")
            .database("app")
            .user("svc")
            .password("pw")
            .build()
            .unwrap();
        let backend = PostgresBackend::new(&descriptor).unwrap();
        let config = backend.config();
        assert_eq!(config.get_dbname(), Some("app"));
        assert_eq!(config.get_user(), Some("svc"));
        assert_eq!(config.get_password(), Some(&b"pw"[..]));
        assert_eq!(config.get_ports(), &[5432]);
    }

    #[test]
    fn rejects_other_kinds() {
        let descriptor = ConnectionDescriptor::sqlite("app.db").unwrap();
        assert!(matches!(
            PostgresBackend::new(&descriptor),
            Err(SqlRowmapError::ConfigError(_))
        ));
    }
}
