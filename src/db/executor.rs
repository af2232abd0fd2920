//! Statement construction and execution for the admin listings.
//!
//! Identifiers reaching this module have already been resolved by the
//! entity layer, but every name is run through the sanitizer once more at
//! the point it enters query text: the table by the operation boundary,
//! selected columns inside [`FieldSpec::select_expr`], and the order
//! column here. Limits and offsets are validated integers, interpolated
//! directly like the identifiers.

use tracing::debug;

use crate::db::identifier::sanitize_identifier;
use crate::db::pool::{DbPool, with_pg_connection, with_sqlite_connection};
use crate::db::types::RowToRecord;
use crate::error::DalResult;
use crate::models::query::{FieldSpec, Record, SortDirection};

/// COUNT statement for a sanitized table name.
pub fn build_count_sql(table: &str) -> String {
    format!("SELECT COUNT(*) AS c FROM {}", table)
}

/// Bounded, ordered, offset SELECT over the given field specs.
///
/// An order column that fails sanitization drops the ORDER BY clause
/// rather than reaching the statement.
pub fn build_select_sql(
    table: &str,
    fields: &[FieldSpec],
    order_column: Option<&str>,
    direction: SortDirection,
    limit: u32,
    offset: u64,
) -> String {
    let select_list = fields
        .iter()
        .map(FieldSpec::select_expr)
        .collect::<Vec<_>>()
        .join(", ");
    let mut sql = format!("SELECT {} FROM {}", select_list, table);
    if let Some(column) = order_column.and_then(sanitize_identifier) {
        sql.push_str(&format!(" ORDER BY {} {}", column, direction.as_sql()));
    }
    sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
    sql
}

/// Execute a count against whichever backend the pool wraps.
pub async fn fetch_count(pool: &DbPool, table: &str) -> DalResult<i64> {
    let sql = build_count_sql(table);
    debug!(sql = %sql, "executing count");
    match pool {
        DbPool::Postgres(p) => {
            with_pg_connection(p, async |conn| {
                Ok(sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_one(&mut *conn)
                    .await?)
            })
            .await
        }
        DbPool::Sqlite(p) => {
            with_sqlite_connection(p, async |conn| {
                Ok(sqlx::query_scalar::<_, i64>(&sql)
                    .fetch_one(&mut *conn)
                    .await?)
            })
            .await
        }
    }
}

/// Execute a listing statement and decode every row through the field
/// specs.
pub async fn fetch_records(
    pool: &DbPool,
    sql: &str,
    fields: &[FieldSpec],
) -> DalResult<Vec<Record>> {
    debug!(sql = %sql, "executing listing");
    match pool {
        DbPool::Postgres(p) => {
            with_pg_connection(p, async |conn| {
                let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
                Ok(rows.iter().map(|row| row.to_record(fields)).collect())
            })
            .await
        }
        DbPool::Sqlite(p) => {
            with_sqlite_connection(p, async |conn| {
                let rows = sqlx::query(sql).fetch_all(&mut *conn).await?;
                Ok(rows.iter().map(|row| row.to_record(fields)).collect())
            })
            .await
        }
    }
}
