//! History store for scored texts.
//!
//! Storage goes through the Repository pattern so backends can be swapped
//! without touching the HTTP layer.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers (crate::http)                            │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                            │
//! │  - paging metadata                                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  AnalysisRepository trait (repository/)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                │
//! ┌───▼──────────────────┐  ┌──────────▼──────────────┐
//! │ Postgres Repository  │  │ Local Repository        │
//! │ (Diesel + r2d2)      │  │ (in-memory)             │
//! └──────────────────────┘  └─────────────────────────┘
//! ```
//!
//! The process wires one repository at startup through [`RepositoryFactory`]
//! and shares it with the handlers; there is no global instance.
//!
//! ```ignore
//! use text_compliance::db::{services, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = RepositoryFactory::from_env().await?;
//!     let record = services::record_analysis(repo.as_ref(), "hello", 50).await?;
//!     Ok(())
//! }
//! ```

#[cfg(not(any(feature = "postgres-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

// Postgres config is colocated with the repository implementation.
#[cfg(feature = "postgres-repo")]
pub use repositories::postgres::PostgresConfig;
#[cfg(not(feature = "postgres-repo"))]
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    _private: (),
}

pub use services::{fetch_history, get_analysis, health_check, record_analysis};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "postgres-repo")]
pub use repositories::PostgresRepository;
pub use repository::{
    AnalysisRepository, ErrorContext, PoolStats, RepositoryError, RepositoryResult,
};
