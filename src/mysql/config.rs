use async_trait::async_trait;
use sqlx::mysql::MySqlConnectOptions;

use super::connection::MysqlConnection;
use crate::backend::{Backend, Connection};
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// `MySQL` backend over sqlx.
#[derive(Debug, Clone)]
pub struct MysqlBackend {
    options: MySqlConnectOptions,
}

impl MysqlBackend {
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if the descriptor is not a complete `MySQL` one.
    pub fn new(descriptor: &ConnectionDescriptor) -> Result<Self, SqlRowmapError> {
        if descriptor.kind() != DatabaseType::Mysql {
            return Err(SqlRowmapError::ConfigError(format!(
                "expected a mysql descriptor, got {}",
                descriptor.kind()
            )));
        }
        descriptor.validate()?;

        let mut options = MySqlConnectOptions::new()
            .host(descriptor.host())
            .username(descriptor.user())
            .database(descriptor.database());
        if let Some(port) = descriptor.effective_port() {
            options = options.port(port);
        }
        if !descriptor.password().is_empty() {
            options = options.password(descriptor.password());
        }
        Ok(Self { options })
    }

    #[must_use]
    pub fn options(&self) -> &MySqlConnectOptions {
        &self.options
    }
}

#[async_trait]
impl Backend for MysqlBackend {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Mysql
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        let conn = MysqlConnection::connect(&self.options).await?;
        Ok(Box::new(conn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_carry_descriptor_fields() {
        let descriptor = ConnectionDescriptor::builder(DatabaseType::Mysql)
            .host("db")
            .database("app")
            .user("root")
            .build()
            .unwrap();
        let backend = MysqlBackend::new(&descriptor).unwrap();
        assert_eq!(backend.options().get_host(), "db");
        assert_eq!(backend.options().get_port(), 3306);
        assert_eq!(backend.options().get_database(), Some("app"));
    }
}
