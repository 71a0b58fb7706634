//! moviefeed - a cached, paginating TMDB data-access layer
//!
//! Sits between a UI and the TMDB API: it caches responses in a bounded
//! in-memory store, derives canonical cache keys, and drives incremental
//! "infinite scroll" list loading with single-flight page fetching and
//! duplicate-free accumulation.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;

pub use client::TmdbClient;
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use pagination::Paginator;
