// PostgreSQL backend
//
// - config: descriptor to tokio-postgres config
// - params: RowValues binding
// - query: row extraction
// - connection: client plus its spawned driver task

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::PostgresBackend;
pub use connection::PostgresConnection;
pub use params::Params;
pub use query::{build_result_set_from_statement, postgres_extract_value};
