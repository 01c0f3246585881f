//! HTTP server module for the compliance backend.
//!
//! Exposes the scoring engine and the history store as a small JSON API on
//! top of axum. Handlers stay thin: they validate at the boundary, call the
//! engine and the store service layer, and map failures through [`AppError`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request validation                                     │
//! │  - JSON serialization                                     │
//! │  - CORS, compression, tracing, panic catching             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  ScoringEngine (services::scoring)                        │
//! │  Store service layer (db::services)                       │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / PostgresRepository                   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! [`AppError`]: error::AppError

#[cfg(feature = "http-server")]
pub mod handlers;

#[cfg(feature = "http-server")]
pub mod router;

#[cfg(feature = "http-server")]
pub mod state;

#[cfg(feature = "http-server")]
pub mod error;

#[cfg(feature = "http-server")]
pub mod dto;

#[cfg(feature = "http-server")]
pub use router::create_router;

#[cfg(feature = "http-server")]
pub use state::AppState;
