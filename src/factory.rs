//! Maps a backend kind to its constructor.

use crate::backend::Backend;
use crate::descriptor::ConnectionDescriptor;
use crate::error::SqlRowmapError;
use crate::types::DatabaseType;

/// Build the backend named by `descriptor.kind()`.
///
/// No connection is opened here; the descriptor is only validated and converted into the
/// driver's configuration.
///
/// # Errors
/// Returns `SqlRowmapError::ConfigError` for an incomplete descriptor, or
/// `SqlRowmapError::Unimplemented` if support for that kind was not compiled in.
pub fn create_backend(
    descriptor: &ConnectionDescriptor,
) -> Result<Box<dyn Backend>, SqlRowmapError> {
    descriptor.validate()?;
    match descriptor.kind() {
        #[cfg(feature = "postgres")]
        DatabaseType::Postgres => Ok(Box::new(crate::postgres::PostgresBackend::new(
            descriptor,
        )?)),
        #[cfg(feature = "mssql")]
        DatabaseType::Mssql => Ok(Box::new(crate::mssql::MssqlBackend::new(descriptor)?)),
        #[cfg(feature = "mysql")]
        DatabaseType::Mysql => Ok(Box::new(crate::mysql::MysqlBackend::new(descriptor)?)),
        #[cfg(feature = "sqlite")]
        DatabaseType::Sqlite => Ok(Box::new(crate::sqlite::SqliteBackend::new(descriptor)?)),
        #[allow(unreachable_patterns)]
        kind => Err(SqlRowmapError::Unimplemented(format!(
            "{kind} support is not enabled in the current build"
        ))),
    }
}
