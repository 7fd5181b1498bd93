//! Application state - Dependency injection container.
//!
//! Handlers reach every use case through the service container and the
//! health check through the database handle.

use std::sync::Arc;

use crate::config::Config;
use crate::infra::{Adapters, Database};
use crate::services::{ServiceContainer, Services};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// All application services
    pub services: Arc<dyn ServiceContainer>,
    /// Database connection
    pub database: Arc<Database>,
}

impl AppState {
    /// Build the full service container over the database and adapters.
    pub fn from_config(database: Arc<Database>, config: Config, adapters: Adapters) -> Self {
        let services = Arc::new(Services::from_connection(
            database.get_connection(),
            config,
            adapters,
        ));

        Self { services, database }
    }

    /// Create application state around an existing container.
    pub fn new(services: Arc<dyn ServiceContainer>, database: Arc<Database>) -> Self {
        Self { services, database }
    }
}
