//! High-level history service layer.
//!
//! Repository-agnostic operations used by the HTTP handlers. They work with
//! any [`AnalysisRepository`] implementation and keep the paging rules in one
//! place regardless of the storage backend.
//!
//! # Usage
//!
//! ```no_run
//! use text_compliance::api::Pagination;
//! use text_compliance::db::{repositories::LocalRepository, services};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     services::record_analysis(&repo, "hello", 50).await?;
//!
//!     let page = services::fetch_history(&repo, Pagination::default()).await?;
//!     println!("{} of {} analyses", page.data.len(), page.pagination.total);
//!     Ok(())
//! }
//! ```

use log::{debug, info};

use super::repository::{AnalysisRepository, RepositoryResult};
use crate::api::{AnalysisId, AnalysisRecord, HistoryPage, Pagination};

/// Check if the store is reachable.
pub async fn health_check<R: AnalysisRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// Persist a scored text and return the stored record.
///
/// `text` is expected to be validated already; the store assigns id and
/// timestamp.
pub async fn record_analysis<R: AnalysisRepository + ?Sized>(
    repo: &R,
    text: &str,
    score: i32,
) -> RepositoryResult<AnalysisRecord> {
    let record = repo.create_analysis(text, score).await?;
    info!(
        "Recorded analysis {} (score {}, {} chars)",
        record.id,
        record.score,
        record.text.chars().count()
    );
    Ok(record)
}

/// Fetch one page of history, newest first, together with its metadata.
///
/// An offset past the end yields an empty page with the real total.
pub async fn fetch_history<R: AnalysisRepository + ?Sized>(
    repo: &R,
    pagination: Pagination,
) -> RepositoryResult<HistoryPage> {
    let data = repo.list_analyses(pagination).await?;
    let total = repo.count_analyses().await?;
    debug!(
        "Fetched {} analyses (limit {}, offset {}, total {})",
        data.len(),
        pagination.limit,
        pagination.offset,
        total
    );

    Ok(HistoryPage {
        data,
        pagination: pagination.meta(total),
    })
}

/// Fetch a single analysis by id.
pub async fn get_analysis<R: AnalysisRepository + ?Sized>(
    repo: &R,
    id: AnalysisId,
) -> RepositoryResult<AnalysisRecord> {
    repo.get_analysis(id).await
}
