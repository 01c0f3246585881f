//! # Text Compliance Backend
//!
//! Scores submitted text against a fixed set of business rules and keeps a
//! paginated history of every scored text.
//!
//! ## Architecture
//!
//! - [`services`]: the scoring engine and boundary validation
//! - [`api`]: domain types shared by every layer
//! - [`db`]: history store, repository pattern and backends
//! - [`config`]: process configuration from the environment
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use text_compliance::services::ScoringEngine;
//!
//! let engine = ScoringEngine::with_defaults().unwrap();
//! assert_eq!(engine.score("Ce texte parle de fraude et de contenu illégal."), 30);
//! ```

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;
pub mod config;
pub mod db;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
