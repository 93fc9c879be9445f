use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value as JsonValue;
use sqlx::mysql::MySqlRow;
use sqlx::types::Json;
use sqlx::{Column, Row, TypeInfo, ValueRef};

use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `MySQL` row, dispatching on the column's declared type.
///
/// # Errors
/// Returns `SqlRowmapError::QueryExecutionError` if the value cannot be decoded.
pub fn mysql_extract_value(row: &MySqlRow, idx: usize) -> Result<RowValues, SqlRowmapError> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(RowValues::Null);
    }

    let type_name = row.column(idx).type_info().name().to_ascii_uppercase();
    let value = match type_name.as_str() {
        "BOOLEAN" => RowValues::Bool(row.try_get::<bool, _>(idx)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            RowValues::Int(row.try_get_unchecked::<i64, _>(idx)?)
        }
        name if name.ends_with("UNSIGNED") => {
            let raw = row.try_get_unchecked::<u64, _>(idx)?;
            RowValues::Int(i64::try_from(raw).map_err(|e| {
                SqlRowmapError::execution("mysql unsigned value out of range", e)
            })?)
        }
        "FLOAT" => RowValues::Float(f64::from(row.try_get::<f32, _>(idx)?)),
        "DOUBLE" => RowValues::Float(row.try_get::<f64, _>(idx)?),
        "DECIMAL" => {
            let text = row.try_get_unchecked::<String, _>(idx)?;
            text.parse::<f64>()
                .map_or(RowValues::Text(text), RowValues::Float)
        }
        "DATETIME" | "TIMESTAMP" => RowValues::Timestamp(row.try_get::<NaiveDateTime, _>(idx)?),
        "DATE" => RowValues::Timestamp(
            row.try_get::<NaiveDate, _>(idx)?
                .and_time(NaiveTime::MIN),
        ),
        "TIME" => RowValues::Text(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        "JSON" => RowValues::JSON(row.try_get::<Json<JsonValue>, _>(idx)?.0),
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT" => {
            RowValues::Blob(row.try_get::<Vec<u8>, _>(idx)?)
        }
        _ => RowValues::Text(row.try_get_unchecked::<String, _>(idx)?),
    };
    Ok(value)
}

/// Collect fetched rows. `column_names` comes from the prepared statement so that an
/// empty result still carries its columns.
///
/// # Errors
/// Returns errors from value extraction.
pub fn build_result_set(
    column_names: Vec<String>,
    rows: &[MySqlRow],
) -> Result<ResultSet, SqlRowmapError> {
    let mut result_set = ResultSet::with_capacity(column_names, rows.len());
    for row in rows {
        let col_count = row.columns().len();
        let mut row_values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            row_values.push(mysql_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }
    Ok(result_set)
}

pub(crate) fn column_names<C: Column>(columns: &[C]) -> Vec<String> {
    columns.iter().map(|c| c.name().to_string()).collect()
}
