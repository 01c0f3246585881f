//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development. All data lives in a
//! single `Vec` behind a lock, which gives fast, deterministic and isolated
//! execution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::api::{AnalysisId, AnalysisRecord, Pagination};
use crate::db::repository::{AnalysisRepository, ErrorContext, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// # Example
/// ```
/// use text_compliance::api::Pagination;
/// use text_compliance::db::repositories::LocalRepository;
/// use text_compliance::db::repository::AnalysisRepository;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let repo = LocalRepository::new();
/// repo.create_analysis("hello", 50).await.unwrap();
///
/// let page = repo.list_analyses(Pagination::default()).await.unwrap();
/// assert_eq!(page.len(), 1);
/// # });
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    /// Records in insertion order
    analyses: Vec<AnalysisRecord>,
    next_seq: i64,
    last_created_at: Option<DateTime<Utc>>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            analyses: Vec::new(),
            next_seq: 1,
            last_created_at: None,
            is_healthy: true,
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Set the health status for testing connection failures.
    ///
    /// While unhealthy, every data operation fails with a retryable
    /// `ConnectionError` and nothing is written.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    /// Get the number of records stored.
    pub fn len(&self) -> usize {
        self.data.read().analyses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a record with an explicit timestamp, for ordering tests.
    ///
    /// Bypasses the monotonic clock so callers can create timestamp ties or
    /// out-of-order histories.
    pub fn insert_with_timestamp(
        &self,
        text: &str,
        score: i32,
        created_at: DateTime<Utc>,
    ) -> AnalysisRecord {
        let mut data = self.data.write();
        Self::push_record(&mut data, text, score, created_at)
    }

    fn push_record(
        data: &mut LocalData,
        text: &str,
        score: i32,
        created_at: DateTime<Utc>,
    ) -> AnalysisRecord {
        let record = AnalysisRecord {
            id: AnalysisId::new_v4(),
            text: text.to_string(),
            score,
            created_at,
            seq: data.next_seq,
        };
        data.next_seq += 1;
        data.last_created_at = Some(
            data.last_created_at
                .map_or(created_at, |last| last.max(created_at)),
        );
        data.analyses.push(record.clone());
        record
    }

    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl AnalysisRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn create_analysis(&self, text: &str, score: i32) -> RepositoryResult<AnalysisRecord> {
        let mut data = self.data.write();
        Self::check_health(&data, "create_analysis")?;

        // Keep created_at non-decreasing even if the wall clock steps back
        let now = Utc::now();
        let created_at = data.last_created_at.map_or(now, |last| last.max(now));

        Ok(Self::push_record(&mut data, text, score, created_at))
    }

    async fn list_analyses(&self, pagination: Pagination) -> RepositoryResult<Vec<AnalysisRecord>> {
        let data = self.data.read();
        Self::check_health(&data, "list_analyses")?;

        let mut records: Vec<&AnalysisRecord> = data.analyses.iter().collect();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.seq.cmp(&a.seq))
        });

        let offset = usize::try_from(pagination.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(pagination.limit).unwrap_or(0);

        Ok(records
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count_analyses(&self) -> RepositoryResult<i64> {
        let data = self.data.read();
        Self::check_health(&data, "count_analyses")?;
        Ok(data.analyses.len() as i64)
    }

    async fn get_analysis(&self, id: AnalysisId) -> RepositoryResult<AnalysisRecord> {
        let data = self.data.read();
        Self::check_health(&data, "get_analysis")?;

        data.analyses
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    "Analysis not found",
                    ErrorContext::new("get_analysis")
                        .with_entity("analysis")
                        .with_entity_id(id),
                )
            })
    }
}
