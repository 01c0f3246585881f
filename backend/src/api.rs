//! Public API surface for the compliance backend.
//!
//! This file consolidates the domain types shared by the scoring engine,
//! the history store and the HTTP layer. All wire types derive
//! Serialize/Deserialize and use camelCase field names.

pub use crate::services::scoring::{ScoreBreakdown, ScoringConfig};
pub use crate::services::validation::{FieldIssue, ValidationErrors};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Analysis identifier (opaque, assigned by the store at creation).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    /// Generate a fresh random identifier.
    pub fn new_v4() -> Self {
        AnalysisId(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for AnalysisId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(AnalysisId)
    }
}

impl From<Uuid> for AnalysisId {
    fn from(id: Uuid) -> Self {
        AnalysisId(id)
    }
}

/// A scored text, as persisted by the history store.
///
/// Records are immutable once created. `seq` is the store's insertion
/// sequence; it never leaves the process and only breaks `created_at` ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub text: String,
    pub score: i32,
    pub created_at: DateTime<Utc>,
    #[serde(skip)]
    pub seq: i64,
}

/// Validated pagination window for history queries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MIN_LIMIT: i64 = 1;
    pub const MAX_LIMIT: i64 = 100;
    pub const DEFAULT_OFFSET: i64 = 0;

    pub fn new(limit: i64, offset: i64) -> Self {
        Self { limit, offset }
    }

    /// Build the response metadata for a page given the total record count.
    pub fn meta(&self, total: i64) -> PaginationMeta {
        PaginationMeta {
            total,
            limit: self.limit,
            offset: self.offset,
            has_more: self.offset.saturating_add(self.limit) < total,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            offset: Self::DEFAULT_OFFSET,
        }
    }
}

/// Pagination metadata returned alongside a history page.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

/// One page of the reverse-chronological history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPage {
    pub data: Vec<AnalysisRecord>,
    pub pagination: PaginationMeta,
}
