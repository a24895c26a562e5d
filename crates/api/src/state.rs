use std::sync::Arc;

use fieldhub_db::Stores;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (store handles and config sit behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Persistence handles, PostgreSQL in production and in-memory in tests.
    pub stores: Stores,
    /// Server configuration (JWT settings are read by the session gate).
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(stores: Stores, config: ServerConfig) -> Self {
        Self {
            stores,
            config: Arc::new(config),
        }
    }
}
