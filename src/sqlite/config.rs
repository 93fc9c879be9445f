use std::path::PathBuf;

use async_trait::async_trait;

use super::connection::SqliteConnection;
use crate::backend::{Backend, Connection};
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// `SQLite` backend. Every call opens the database file anew.
#[derive(Debug, Clone)]
pub struct SqliteBackend {
    path: PathBuf,
}

impl SqliteBackend {
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if the descriptor is not a `SQLite` one.
    pub fn new(descriptor: &ConnectionDescriptor) -> Result<Self, SqlRowmapError> {
        if descriptor.kind() != DatabaseType::Sqlite {
            return Err(SqlRowmapError::ConfigError(format!(
                "expected a sqlite descriptor, got {}",
                descriptor.kind()
            )));
        }
        descriptor.validate()?;
        Ok(Self {
            path: PathBuf::from(descriptor.database()),
        })
    }

    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn kind(&self) -> DatabaseType {
        DatabaseType::Sqlite
    }

    async fn open(&self) -> Result<Box<dyn Connection>, SqlRowmapError> {
        let conn = SqliteConnection::open(self.path.clone()).await?;
        Ok(Box::new(conn))
    }
}
