use serde::{Deserialize, Serialize};

use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// Where and how to connect: backend kind, address, database and credentials.
///
/// Immutable once built. For `SQLite`, `database` is the file path and the network fields
/// are unused.
///
/// ```rust
/// use sql_rowmap::prelude::*;
///
/// let descriptor = ConnectionDescriptor::builder(DatabaseType::Mssql)
///     .host("localhost")
///     .database("devdb")
///     .user("sa")
///     .password("secret")
///     .build()?;
/// assert_eq!(descriptor.effective_port(), Some(1433));
/// # Ok::<(), SqlRowmapError>(())
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionDescriptor {
    kind: DatabaseType,
    #[serde(default)]
    host: String,
    #[serde(default)]
    port: Option<u16>,
    database: String,
    #[serde(default)]
    user: String,
    #[serde(default)]
    password: String,
    #[serde(default)]
    instance_name: Option<String>,
    #[serde(default)]
    trust_cert: bool,
}

impl ConnectionDescriptor {
    #[must_use]
    pub fn builder(kind: DatabaseType) -> ConnectionDescriptorBuilder {
        ConnectionDescriptorBuilder::new(kind)
    }

    /// Descriptor for a `SQLite` database file.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if `path` is empty.
    pub fn sqlite(path: impl Into<String>) -> Result<Self, SqlRowmapError> {
        Self::builder(DatabaseType::Sqlite).database(path).build()
    }

    /// Load a descriptor from JSON such as
    /// `{"kind": "postgres", "host": "db", "database": "app", "user": "u", "password": "p"}`.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if the JSON is malformed or required fields
    /// are missing.
    pub fn from_json(json: &str) -> Result<Self, SqlRowmapError> {
        let descriptor: Self = serde_json::from_str(json)
            .map_err(|e| SqlRowmapError::ConfigError(format!("invalid descriptor JSON: {e}")))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Check the fields the backend kind requires.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` naming the first missing field.
    pub fn validate(&self) -> Result<(), SqlRowmapError> {
        if self.database.is_empty() {
            return Err(SqlRowmapError::ConfigError(
                "database is required".to_string(),
            ));
        }
        if self.kind.is_networked() {
            if self.host.is_empty() {
                return Err(SqlRowmapError::ConfigError("host is required".to_string()));
            }
            if self.user.is_empty() {
                return Err(SqlRowmapError::ConfigError("user is required".to_string()));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn kind(&self) -> DatabaseType {
        self.kind
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The configured port, or the backend's default port.
    #[must_use]
    pub fn effective_port(&self) -> Option<u16> {
        self.port.or_else(|| self.kind.default_port())
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    #[must_use]
    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    #[must_use]
    pub fn trust_cert(&self) -> bool {
        self.trust_cert
    }
}

impl std::fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("kind", &self.kind)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("instance_name", &self.instance_name)
            .field("trust_cert", &self.trust_cert)
            .finish()
    }
}

/// Fluent builder for [`ConnectionDescriptor`].
#[derive(Debug, Clone)]
pub struct ConnectionDescriptorBuilder {
    descriptor: ConnectionDescriptor,
}

impl ConnectionDescriptorBuilder {
    #[must_use]
    pub fn new(kind: DatabaseType) -> Self {
        Self {
            descriptor: ConnectionDescriptor {
                kind,
                host: String::new(),
                port: None,
                database: String::new(),
                user: String::new(),
                password: String::new(),
                instance_name: None,
                trust_cert: false,
            },
        }
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.descriptor.host = host.into();
        self
    }

    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.descriptor.port = Some(port);
        self
    }

    #[must_use]
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.descriptor.database = database.into();
        self
    }

    #[must_use]
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.descriptor.user = user.into();
        self
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.descriptor.password = password.into();
        self
    }

    /// Named SQL Server instance (resolved through the SQL Browser service).
    #[must_use]
    pub fn instance_name(mut self, instance_name: impl Into<String>) -> Self {
        self.descriptor.instance_name = Some(instance_name.into());
        self
    }

    /// Accept the server's TLS certificate without validation (SQL Server).
    #[must_use]
    pub fn trust_cert(mut self, trust_cert: bool) -> Self {
        self.descriptor.trust_cert = trust_cert;
        self
    }

    /// Finish the descriptor.
    ///
    /// # Errors
    /// Returns `SqlRowmapError::ConfigError` if a required field is missing.
    pub fn build(self) -> Result<ConnectionDescriptor, SqlRowmapError> {
        self.descriptor.validate()?;
        Ok(self.descriptor)
    }
}
