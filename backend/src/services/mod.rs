//! Service layer for business logic.
//!
//! This module contains the pure parts of the request pipeline: the scoring
//! engine and the boundary validation schemas. Neither performs I/O.

pub mod scoring;

pub mod validation;

pub use scoring::{ScoreBreakdown, ScoringConfig, ScoringEngine, ScoringError};
pub use validation::{
    validate_analyze_request, validate_pagination, AnalyzeRequest, FieldIssue, HistoryQuery,
    ValidationErrors,
};
