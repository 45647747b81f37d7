//! Business logic services

pub mod aggregate;
pub mod catalog;
pub mod forms;
pub mod guard;
pub mod normalize;
pub mod selection;
pub mod validation;

use std::sync::Arc;

use crate::repository::CatalogStore;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
}

impl Services {
    /// Create all services over the given store
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog: catalog::CatalogService::new(store),
        }
    }
}
