use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use futures_util::TryStreamExt;
use tiberius::{ColumnData, FromSql};

use super::config::MssqlClient;
use super::params::bind_query_params;
use crate::error::SqlRowmapError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Run a query and collect its first result set.
///
/// # Errors
/// Returns `SqlRowmapError::QueryExecutionError` if the query or row streaming fails.
pub async fn build_result_set(
    client: &mut MssqlClient,
    query: &str,
    params: &[RowValues],
) -> Result<ResultSet, SqlRowmapError> {
    let query_builder = bind_query_params(query, params);

    let mut stream = query_builder
        .query(client)
        .await
        .map_err(|e| SqlRowmapError::execution("SQL Server query error", e))?;

    let column_names: Vec<String> = stream
        .columns()
        .await
        .map_err(|e| SqlRowmapError::execution("SQL Server column fetch error", e))?
        .map(|cols| cols.iter().map(|col| col.name().to_string()).collect())
        .unwrap_or_default();

    let mut result_set = ResultSet::new(column_names);
    let mut rows_stream = stream.into_row_stream();
    while let Some(row) = rows_stream
        .try_next()
        .await
        .map_err(|e| SqlRowmapError::execution("SQL Server row fetch error", e))?
    {
        let row_values = row
            .into_iter()
            .map(|data| extract_value(&data))
            .collect::<Result<Vec<_>, _>>()?;
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

fn extract_value(data: &ColumnData<'static>) -> Result<RowValues, SqlRowmapError> {
    let value = match data {
        ColumnData::U8(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I16(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I32(v) => v.map(|v| RowValues::Int(i64::from(v))),
        ColumnData::I64(v) => v.map(RowValues::Int),
        ColumnData::F32(v) => v.map(|v| RowValues::Float(f64::from(v))),
        ColumnData::F64(v) => v.map(RowValues::Float),
        ColumnData::Bit(v) => v.map(RowValues::Bool),
        ColumnData::String(v) => v.as_ref().map(|s| RowValues::Text(s.to_string())),
        ColumnData::Guid(v) => v.map(|g| RowValues::Text(g.to_string())),
        ColumnData::Binary(v) => v.as_ref().map(|b| RowValues::Blob(b.to_vec())),
        ColumnData::Numeric(v) => v.map(|n| RowValues::Float(f64::from(n))),
        ColumnData::DateTime(_) | ColumnData::SmallDateTime(_) | ColumnData::DateTime2(_) => {
            NaiveDateTime::from_sql(data)?.map(RowValues::Timestamp)
        }
        ColumnData::DateTimeOffset(_) => {
            DateTime::<Utc>::from_sql(data)?.map(|v| RowValues::Timestamp(v.naive_utc()))
        }
        ColumnData::Date(_) => NaiveDate::from_sql(data)?
            .map(|d| RowValues::Timestamp(d.and_time(NaiveTime::MIN))),
        ColumnData::Time(_) => NaiveTime::from_sql(data)?.map(|t| RowValues::Text(t.to_string())),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(SqlRowmapError::execution(
                "SQL Server",
                "unsupported column type in result",
            ));
        }
    };
    Ok(value.unwrap_or(RowValues::Null))
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    #[test]
    fn scalar_columns_map_to_row_values() {
        assert_eq!(extract_value(&ColumnData::I32(Some(5))).unwrap(), RowValues::Int(5));
        assert_eq!(
            extract_value(&ColumnData::String(Some(Cow::Borrowed("x")))).unwrap(),
            RowValues::Text("x".into())
        );
        assert_eq!(
            extract_value(&ColumnData::Bit(Some(true))).unwrap(),
            RowValues::Bool(true)
        );
    }

    #[test]
    fn typed_nulls_are_null() {
        assert_eq!(extract_value(&ColumnData::I64(None)).unwrap(), RowValues::Null);
        assert_eq!(extract_value(&ColumnData::String(None)).unwrap(), RowValues::Null);
    }
}
