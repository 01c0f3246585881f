//! Repository trait definitions for database operations.
//!
//! - [`error`]: Error types for repository operations
//! - [`analysis`]: History store operations for scored texts

pub mod analysis;
pub mod error;

pub use analysis::{AnalysisRepository, PoolStats};
pub use error::{ErrorContext, RepositoryError, RepositoryResult};
