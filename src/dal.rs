//! The data-access layer: pooled, partial-result read operations.
//!
//! One `Dal` is constructed per process and shared across requests, which
//! gives the process exactly one connection pool. The pool is created on
//! first use; tests inject a prebuilt pool instead of reaching for a
//! global.
//!
//! Every public operation follows the same policy: if credentials are
//! missing or the target table does not sanitize, it short-circuits
//! without touching the pool; if the query itself fails, the failure is
//! logged with the operation name and target table and folded into an
//! empty result flagged `partial`. Callers never observe an error.

use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::db::executor;
use crate::db::identifier::sanitize_identifier;
use crate::db::pool::{self, DbPool};
use crate::error::{DalError, DalResult};
use crate::models::query::{CountOutcome, ListSpec, QueryPage, Record, TopList};

pub struct Dal {
    config: Config,
    pool: OnceCell<Option<DbPool>>,
}

impl Dal {
    /// Create a DAL that lazily builds its pool from configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    /// Create a DAL over an existing pool (test injection).
    pub fn with_pool(config: Config, pool: DbPool) -> Self {
        Self {
            config,
            pool: OnceCell::new_with(Some(Some(pool))),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fast pre-check used by every operation before touching the pool.
    pub fn have_credentials(&self) -> bool {
        self.config.have_credentials()
    }

    /// True once a pool construction attempt has happened. Lets tests
    /// assert that short-circuited operations never reach the pool.
    pub fn pool_initialized(&self) -> bool {
        self.pool.initialized()
    }

    /// The process-wide pool, built on first use. Construction failures
    /// are logged and cached as an absent pool so they resurface as
    /// partial results rather than crashing the process.
    async fn pool(&self) -> Option<&DbPool> {
        self.pool
            .get_or_init(|| async {
                match pool::connect_lazy(&self.config) {
                    Ok(pool) => {
                        info!(backend = pool.backend(), "database pool created");
                        Some(pool)
                    }
                    Err(err) => {
                        error!(error = %err, "pool construction failed; queries will report partial results");
                        None
                    }
                }
            })
            .await
            .as_ref()
    }

    /// Close the pool if one was created.
    pub async fn close(&self) {
        if let Some(Some(pool)) = self.pool.get() {
            pool.close().await;
        }
    }

    /// Row count of `table`, or 0 flagged partial when the count could
    /// not run live.
    pub async fn count(&self, table: Option<&str>) -> CountOutcome {
        match self.try_count(table).await {
            Ok(count) => CountOutcome {
                count,
                partial: false,
            },
            Err(err) => {
                log_partial("count", table.unwrap_or(""), &err);
                CountOutcome {
                    count: 0,
                    partial: true,
                }
            }
        }
    }

    /// One page of a listing plus the table's total row count.
    ///
    /// `page` is floored at 1 and `limit` clamped into the spec's range
    /// before use, independent of caller input.
    pub async fn list_page(&self, spec: &ListSpec, page: u32, limit: u32) -> QueryPage {
        let page = page.max(1);
        let limit = limit.clamp(1, spec.max_limit);
        match self.try_list_page(spec, page, limit).await {
            Ok((items, total)) => QueryPage {
                items,
                total,
                page,
                limit,
                partial: false,
            },
            Err(err) => {
                log_partial("list_page", spec.table.as_deref().unwrap_or(""), &err);
                QueryPage::unavailable(page, limit)
            }
        }
    }

    /// Bounded "recent N" listing without a total count.
    pub async fn list_top(&self, spec: &ListSpec, limit: u32) -> TopList {
        let limit = limit.clamp(1, spec.max_limit);
        match self.try_list_top(spec, limit).await {
            Ok(items) => TopList {
                items,
                partial: false,
            },
            Err(err) => {
                log_partial("list_top", spec.table.as_deref().unwrap_or(""), &err);
                TopList::unavailable()
            }
        }
    }

    async fn try_count(&self, table: Option<&str>) -> DalResult<i64> {
        if !self.have_credentials() {
            return Err(DalError::NoCredentials);
        }
        let raw = table.unwrap_or("");
        let table = sanitize_identifier(raw).ok_or_else(|| DalError::invalid_identifier(raw))?;
        let pool = self.usable_pool().await?;
        executor::fetch_count(pool, table).await
    }

    async fn try_list_page(
        &self,
        spec: &ListSpec,
        page: u32,
        limit: u32,
    ) -> DalResult<(Vec<Record>, i64)> {
        if !self.have_credentials() {
            return Err(DalError::NoCredentials);
        }
        let raw = spec.table.as_deref().unwrap_or("");
        let table = sanitize_identifier(raw).ok_or_else(|| DalError::invalid_identifier(raw))?;
        let pool = self.usable_pool().await?;

        // Total first; no snapshot spans the two statements, so the total
        // may be stale relative to the page under concurrent writes.
        let total = executor::fetch_count(pool, table).await?;
        let offset = (u64::from(page) - 1) * u64::from(limit);
        let sql = executor::build_select_sql(
            table,
            &spec.fields,
            spec.order_column.as_deref(),
            spec.direction,
            limit,
            offset,
        );
        let items = executor::fetch_records(pool, &sql, &spec.fields).await?;
        Ok((items, total))
    }

    async fn try_list_top(&self, spec: &ListSpec, limit: u32) -> DalResult<Vec<Record>> {
        if !self.have_credentials() {
            return Err(DalError::NoCredentials);
        }
        let raw = spec.table.as_deref().unwrap_or("");
        let table = sanitize_identifier(raw).ok_or_else(|| DalError::invalid_identifier(raw))?;
        let pool = self.usable_pool().await?;
        let sql = executor::build_select_sql(
            table,
            &spec.fields,
            spec.order_column.as_deref(),
            spec.direction,
            limit,
            0,
        );
        executor::fetch_records(pool, &sql, &spec.fields).await
    }

    async fn usable_pool(&self) -> DalResult<&DbPool> {
        self.pool()
            .await
            .ok_or_else(|| DalError::query("connection pool unavailable", None))
    }
}

/// One log line per folded failure, with enough context to diagnose.
fn log_partial(operation: &'static str, table: &str, err: &DalError) {
    match err {
        DalError::NoCredentials => {
            debug!(operation, "skipping query: no database credentials");
        }
        DalError::InvalidIdentifier { name } => {
            warn!(operation, identifier = %name, "skipping query: identifier failed sanitization");
        }
        DalError::Query { message, sql_state } => {
            warn!(
                operation,
                table = %table,
                sql_state = ?sql_state,
                error = %message,
                "query failed; returning partial result"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sqlx::sqlite::SqlitePoolOptions;

    fn no_creds_config() -> Config {
        let mut config = Config::parse_from(["incubator-admin"]);
        config.database_url = None;
        config.pg_user = None;
        config
    }

    fn creds_config() -> Config {
        let mut config = no_creds_config();
        config.database_url = Some("sqlite::memory:".to_string());
        config
    }

    #[tokio::test]
    async fn test_count_without_credentials_never_touches_pool() {
        let dal = Dal::new(no_creds_config());
        let outcome = dal.count(Some("users")).await;
        assert_eq!(outcome.count, 0);
        assert!(outcome.partial);
        assert!(!dal.pool_initialized());
    }

    #[tokio::test]
    async fn test_count_with_injected_pool() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::query("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT)")
            .execute(&pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO users (name) VALUES ('ada'), ('grace')")
            .execute(&pool)
            .await
            .unwrap();

        let dal = Dal::with_pool(creds_config(), DbPool::Sqlite(pool));
        let outcome = dal.count(Some("users")).await;
        assert_eq!(outcome.count, 2);
        assert!(!outcome.partial);
    }

    #[tokio::test]
    async fn test_pool_is_created_once() {
        let dal = Dal::new(creds_config());
        assert!(!dal.pool_initialized());
        let first = dal.pool().await.unwrap() as *const DbPool;
        let second = dal.pool().await.unwrap() as *const DbPool;
        assert_eq!(first, second);
        assert!(dal.pool_initialized());
    }

    #[tokio::test]
    async fn test_count_of_invalid_table_is_partial() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let dal = Dal::with_pool(creds_config(), DbPool::Sqlite(pool));

        let outcome = dal.count(Some("users; DROP TABLE users")).await;
        assert_eq!(outcome.count, 0);
        assert!(outcome.partial);

        let outcome = dal.count(None).await;
        assert!(outcome.partial);
    }
}
