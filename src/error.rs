use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlRowmapError {
    /// The SQL text starts with none of `SELECT`, `INSERT`, `UPDATE`, `DELETE`.
    #[error("Unsupported statement kind: {0}")]
    UnsupportedStatementKind(String),

    /// The backend rejected or failed a statement.
    #[error("Query execution error: {0}")]
    QueryExecutionError(String),

    #[error("Field mapping error on `{field}`: {message}")]
    FieldMappingError { field: String, message: String },

    #[error("No rows affected: {0}")]
    NoRowsAffected(String),

    #[error("Parameter error: {0}")]
    ParameterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unimplemented feature: {0}")]
    Unimplemented(String),
}

impl SqlRowmapError {
    pub(crate) fn execution(context: &str, err: impl std::fmt::Display) -> Self {
        SqlRowmapError::QueryExecutionError(format!("{context}: {err}"))
    }

    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        SqlRowmapError::FieldMappingError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// Driver errors raised while a statement runs are execution failures; connection setup
// paths map their errors to `ConnectionError` explicitly before `?` sees them.
#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for SqlRowmapError {
    fn from(err: tokio_postgres::Error) -> Self {
        SqlRowmapError::execution("postgres", err)
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for SqlRowmapError {
    fn from(err: rusqlite::Error) -> Self {
        SqlRowmapError::execution("sqlite", err)
    }
}

#[cfg(feature = "mssql")]
impl From<tiberius::error::Error> for SqlRowmapError {
    fn from(err: tiberius::error::Error) -> Self {
        SqlRowmapError::execution("SQL Server", err)
    }
}

#[cfg(feature = "mysql")]
impl From<sqlx::Error> for SqlRowmapError {
    fn from(err: sqlx::Error) -> Self {
        SqlRowmapError::execution("mysql", err)
    }
}
