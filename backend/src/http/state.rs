//! Application state for the HTTP server.

use std::fmt::Display;
use std::sync::Arc;

use tracing::error;

use super::error::AppError;
use crate::db::repository::AnalysisRepository;
use crate::services::scoring::ScoringEngine;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for history storage
    pub repository: Arc<dyn AnalysisRepository>,
    /// Immutable scoring engine shared by every request
    pub engine: Arc<ScoringEngine>,
    /// Whether 500 responses carry the underlying error message
    pub expose_details: bool,
}

impl AppState {
    /// Create a new application state. Fault details are hidden.
    pub fn new(repository: Arc<dyn AnalysisRepository>, engine: Arc<ScoringEngine>) -> Self {
        Self {
            repository,
            engine,
            expose_details: false,
        }
    }

    /// Toggle fault details in 500 responses (development mode).
    pub fn with_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }

    /// Log an unexpected failure and return its message only in development mode.
    pub fn fault_details(&self, err: impl Display) -> Option<String> {
        let message = err.to_string();
        error!(error = %message, "request failed");
        self.expose_details.then_some(message)
    }

    /// Log an unexpected failure and turn it into the generic 500 error.
    pub fn server_fault(&self, err: impl Display) -> AppError {
        AppError::Internal {
            details: self.fault_details(err),
        }
    }
}
