//! Postgres repository implementation using Diesel.
//!
//! ## Features
//!
//! - Connection pooling with r2d2
//! - Bounded pool checkout and per-statement timeouts
//! - Connection health monitoring
//! - Automatic migration execution
//!
//! Failed operations are reported, never retried; retry policy belongs to
//! the caller.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `DATABASE_URL` or `PG_DATABASE_URL`: Connection string (required)
//! - `PG_POOL_MAX`: Maximum pool size (default: 10)
//! - `PG_POOL_MIN`: Minimum pool size (default: 1)
//! - `PG_CONN_TIMEOUT_SEC`: Pool checkout timeout in seconds (default: 30)
//! - `PG_IDLE_TIMEOUT_SEC`: Idle connection timeout in seconds (default: 600)
//! - `PG_STATEMENT_TIMEOUT_MS`: Per-statement timeout in milliseconds (default: 5000)

use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool};
use diesel::sql_query;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task;

use crate::api::{AnalysisId, AnalysisRecord, Pagination};
use crate::db::repository::{
    AnalysisRepository, ErrorContext, PoolStats, RepositoryError, RepositoryResult,
};

mod models;
mod schema;

use models::*;
use schema::*;

type PgPool = Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("src/db/repositories/postgres/migrations");

/// Configuration for connecting to Postgres.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub database_url: String,
    /// Maximum number of connections in the pool
    pub max_pool_size: u32,
    /// Minimum number of connections in the pool
    pub min_pool_size: u32,
    /// Pool checkout timeout in seconds
    pub connection_timeout_sec: u64,
    /// Idle connection timeout in seconds
    pub idle_timeout_sec: u64,
    /// `statement_timeout` applied to every pooled connection, in milliseconds
    pub statement_timeout_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 10,
            min_pool_size: 1,
            connection_timeout_sec: 30,
            idle_timeout_sec: 600,
            statement_timeout_ms: 5_000,
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Create configuration from environment variables.
    ///
    /// See the module documentation for the recognised variables.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .or_else(|_| std::env::var("PG_DATABASE_URL"))
            .map_err(|_| "DATABASE_URL or PG_DATABASE_URL must be set".to_string())?;

        let defaults = Self::default();
        Ok(Self {
            database_url,
            max_pool_size: env_or("PG_POOL_MAX", defaults.max_pool_size),
            min_pool_size: env_or("PG_POOL_MIN", defaults.min_pool_size),
            connection_timeout_sec: env_or("PG_CONN_TIMEOUT_SEC", defaults.connection_timeout_sec),
            idle_timeout_sec: env_or("PG_IDLE_TIMEOUT_SEC", defaults.idle_timeout_sec),
            statement_timeout_ms: env_or("PG_STATEMENT_TIMEOUT_MS", defaults.statement_timeout_ms),
        })
    }

    /// Create a new configuration with a database URL.
    pub fn with_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Default::default()
        }
    }
}

/// Applies `statement_timeout` when r2d2 opens a connection.
#[derive(Debug, Clone, Copy)]
struct StatementTimeout(u64);

impl CustomizeConnection<PgConnection, diesel::r2d2::Error> for StatementTimeout {
    fn on_acquire(&self, conn: &mut PgConnection) -> Result<(), diesel::r2d2::Error> {
        sql_query(format!("SET statement_timeout = {}", self.0))
            .execute(conn)
            .map(|_| ())
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Diesel-backed repository for Postgres.
#[derive(Clone, Debug)]
pub struct PostgresRepository {
    pool: PgPool,
    config: PostgresConfig,
    total_queries: Arc<AtomicU64>,
    failed_queries: Arc<AtomicU64>,
}

impl PostgresRepository {
    /// Create a new repository and run pending migrations.
    pub fn new(config: PostgresConfig) -> RepositoryResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(&config.database_url);

        let pool = Pool::builder()
            .max_size(config.max_pool_size)
            .min_idle(Some(config.min_pool_size))
            .connection_timeout(Duration::from_secs(config.connection_timeout_sec))
            .idle_timeout(Some(Duration::from_secs(config.idle_timeout_sec)))
            .test_on_check_out(true)
            .connection_customizer(Box::new(StatementTimeout(config.statement_timeout_ms)))
            .build(manager)
            .map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("create_pool")
                        .with_details(format!("max_size={}", config.max_pool_size)),
                )
            })?;

        {
            let mut conn = pool.get().map_err(|e| {
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new("get_connection_for_migrations"),
                )
            })?;
            Self::run_migrations(&mut conn)?;
        }

        log::info!(
            "Postgres repository ready (pool max={}, statement_timeout={}ms)",
            config.max_pool_size,
            config.statement_timeout_ms
        );

        Ok(Self {
            pool,
            config,
            total_queries: Arc::new(AtomicU64::new(0)),
            failed_queries: Arc::new(AtomicU64::new(0)),
        })
    }

    fn run_migrations(conn: &mut PgConnection) -> RepositoryResult<()> {
        conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Migration failed: {}", e),
                ErrorContext::new("run_migrations"),
            )
        })?;

        Ok(())
    }

    /// Run a blocking Diesel operation on a pooled connection.
    ///
    /// The work happens on tokio's blocking pool. Checkout waits at most
    /// `connection_timeout_sec`; the statement itself is bounded by the
    /// connection's `statement_timeout`.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> RepositoryResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> RepositoryResult<T> + Send + 'static,
    {
        let pool = self.pool.clone();
        let total_queries = self.total_queries.clone();
        let failed_queries = self.failed_queries.clone();

        task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                RepositoryError::connection_with_context(
                    e.to_string(),
                    ErrorContext::new(operation).with_details("get_connection"),
                )
            })?;

            total_queries.fetch_add(1, Ordering::Relaxed);
            f(&mut conn).map_err(|e| {
                failed_queries.fetch_add(1, Ordering::Relaxed);
                e.with_operation(operation)
            })
        })
        .await
        .map_err(|e| {
            RepositoryError::internal_with_context(
                format!("Task join error: {}", e),
                ErrorContext::new(operation).with_details("spawn_blocking"),
            )
        })?
    }
}

fn map_diesel_error(err: diesel::result::Error) -> RepositoryError {
    RepositoryError::from(err)
}

#[async_trait]
impl AnalysisRepository for PostgresRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.with_conn("health_check", |conn| {
            sql_query("SELECT 1")
                .execute(conn)
                .map(|_| true)
                .map_err(map_diesel_error)
        })
        .await
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        let state = self.pool.state();
        Some(PoolStats {
            connections_in_use: state.connections - state.idle_connections,
            idle_connections: state.idle_connections,
            total_connections: state.connections,
            max_size: self.config.max_pool_size,
            total_queries: self.total_queries.load(Ordering::Relaxed),
            failed_queries: self.failed_queries.load(Ordering::Relaxed),
        })
    }

    async fn create_analysis(&self, text: &str, score: i32) -> RepositoryResult<AnalysisRecord> {
        let text = text.to_string();
        self.with_conn("create_analysis", move |conn| {
            conn.transaction(|tx| {
                let row = NewAnalysisRow {
                    id: AnalysisId::new_v4().value(),
                    text: &text,
                    score,
                };

                diesel::insert_into(analyses::table)
                    .values(&row)
                    .returning(AnalysisRow::as_returning())
                    .get_result::<AnalysisRow>(tx)
            })
            .map(AnalysisRecord::from)
            .map_err(map_diesel_error)
        })
        .await
    }

    async fn list_analyses(&self, pagination: Pagination) -> RepositoryResult<Vec<AnalysisRecord>> {
        self.with_conn("list_analyses", move |conn| {
            let rows = analyses::table
                .select(AnalysisRow::as_select())
                .order((analyses::created_at.desc(), analyses::seq.desc()))
                .limit(pagination.limit)
                .offset(pagination.offset)
                .load::<AnalysisRow>(conn)
                .map_err(map_diesel_error)?;

            Ok(rows.into_iter().map(AnalysisRecord::from).collect())
        })
        .await
    }

    async fn count_analyses(&self) -> RepositoryResult<i64> {
        self.with_conn("count_analyses", |conn| {
            analyses::table
                .count()
                .get_result::<i64>(conn)
                .map_err(map_diesel_error)
        })
        .await
    }

    async fn get_analysis(&self, id: AnalysisId) -> RepositoryResult<AnalysisRecord> {
        self.with_conn("get_analysis", move |conn| {
            analyses::table
                .find(id.value())
                .select(AnalysisRow::as_select())
                .first::<AnalysisRow>(conn)
                .optional()
                .map_err(map_diesel_error)?
                .map(AnalysisRecord::from)
                .ok_or_else(|| {
                    RepositoryError::not_found_with_context(
                        "Analysis not found",
                        ErrorContext::new("get_analysis")
                            .with_entity("analysis")
                            .with_entity_id(id),
                    )
                })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PostgresConfig::default();
        assert_eq!(config.max_pool_size, 10);
        assert_eq!(config.statement_timeout_ms, 5_000);
        assert!(config.database_url.is_empty());
    }

    #[test]
    fn test_with_url() {
        let config = PostgresConfig::with_url("postgres://localhost/scores");
        assert_eq!(config.database_url, "postgres://localhost/scores");
        assert_eq!(config.connection_timeout_sec, 30);
    }
}
