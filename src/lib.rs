//! Catalog Server
//!
//! Local library catalog of authors, books, genres and book copies. The
//! orchestration core in [`services`] assembles views from concurrent store
//! lookups, validates form submissions, and refuses removals that would
//! leave dangling references.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod views;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
