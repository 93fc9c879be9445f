// MySQL backend
//
// - config: descriptor to sqlx connect options
// - params: binding RowValues onto a sqlx query
// - query: column extraction by declared type
// - connection: a single sqlx MySqlConnection

pub mod config;
pub mod connection;
pub mod params;
pub mod query;

pub use config::MysqlBackend;
pub use connection::MysqlConnection;
pub use params::bind_query_params;
pub use query::{build_result_set, mysql_extract_value};
