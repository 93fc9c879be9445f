// SQL Server backend
//
// - config: descriptor to tiberius config
// - params: binding RowValues onto a tiberius query
// - query: column data extraction
// - connection: tiberius client over a compat TCP stream

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::{MssqlBackend, MssqlClient};
pub use connection::MssqlConnection;
pub use params::bind_query_params;
pub use query::build_result_set;
