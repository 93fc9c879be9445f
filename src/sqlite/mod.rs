// SQLite backend
//
// - config: backend construction from a connection descriptor
// - params: RowValues to rusqlite values
// - query: result extraction and building
// - connection: per-call connection running rusqlite on blocking threads

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::SqliteBackend;
pub use connection::SqliteConnection;
pub use params::Params;
pub use query::build_result_set;
