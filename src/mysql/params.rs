use sqlx::MySql;
use sqlx::mysql::MySqlArguments;
use sqlx::query::Query;
use sqlx::types::Json;

use crate::types::RowValues;

/// Bind parameters in order onto a query whose placeholders are `?`.
pub fn bind_query_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[RowValues],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            RowValues::Int(i) => query.bind(*i),
            RowValues::Float(f) => query.bind(*f),
            RowValues::Text(s) => query.bind(s.clone()),
            RowValues::Bool(b) => query.bind(*b),
            RowValues::Timestamp(dt) => query.bind(*dt),
            RowValues::Null => query.bind(Option::<String>::None),
            RowValues::JSON(jsval) => query.bind(Json(jsval.clone())),
            RowValues::Blob(bytes) => query.bind(bytes.clone()),
        };
    }
    query
}
