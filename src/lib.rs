//! Biblioteca Library Management Client
//!
//! Client-side core of the Biblioteca library management app. It keeps a
//! durable session with an offline administrative path and drives the
//! backend's JSON API through typed REST gateways, including the loan and
//! return lifecycle that moves both records as a pair.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod services;
pub mod storage;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all commands
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateways: Arc<gateway::Gateways>,
    pub services: Arc<services::Services>,
}

impl AppState {
    /// Wire the full client: HTTP engine, gateways, local store, services.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let api = gateway::ApiClient::new(&config.api)?;
        let store = storage::LocalStore::new(&config.storage.data_dir);
        let gateways = gateway::Gateways::new(api, store.clone());
        let services = services::Services::new(&gateways, store);
        Ok(Self {
            config: Arc::new(config),
            gateways: Arc::new(gateways),
            services: Arc::new(services),
        })
    }
}
