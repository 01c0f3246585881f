//! History store trait.
//!
//! Append-only persistence of scored texts, read back newest first in
//! offset/limit pages.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::api::{AnalysisId, AnalysisRecord, Pagination};

/// Connection pool statistics, reported by pooled backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Number of connections currently in use
    pub connections_in_use: u32,
    /// Number of idle connections
    pub idle_connections: u32,
    /// Total number of connections in the pool
    pub total_connections: u32,
    /// Maximum pool size
    pub max_size: u32,
    /// Total queries executed
    pub total_queries: u64,
    /// Total failed queries
    pub failed_queries: u64,
}

/// Repository trait for analysis history operations.
///
/// Records are created once and never updated or deleted. Implementations
/// order history by `created_at` descending and break ties with the
/// insertion sequence, also descending, so identical queries return
/// identical pages.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait AnalysisRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the database connection is healthy.
    ///
    /// # Returns
    /// - `Ok(true)` if connection is healthy
    /// - `Ok(false)` if connection is unhealthy but no error occurred
    /// - `Err(RepositoryError)` if an error occurred during the check
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Connection pool statistics, or `None` for backends without a pool.
    fn pool_stats(&self) -> Option<PoolStats> {
        None
    }

    // ==================== Analysis Operations ====================

    /// Persist a scored text.
    ///
    /// Assigns the id, creation timestamp and insertion sequence. The write
    /// is atomic: the record is either fully visible afterwards or not at all.
    async fn create_analysis(&self, text: &str, score: i32) -> RepositoryResult<AnalysisRecord>;

    /// Fetch one page of history, newest first.
    ///
    /// An offset past the end yields an empty list, not an error.
    async fn list_analyses(&self, pagination: Pagination) -> RepositoryResult<Vec<AnalysisRecord>>;

    /// Total number of stored records.
    async fn count_analyses(&self) -> RepositoryResult<i64>;

    /// Fetch a single record.
    ///
    /// # Returns
    /// * `Err(RepositoryError::NotFound)` - If no record has this id
    async fn get_analysis(&self, id: AnalysisId) -> RepositoryResult<AnalysisRecord>;
}
