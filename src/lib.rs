pub mod config;
pub mod errors;
pub mod identity;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use chrono::Local;
use tokio::sync::RwLock;

use crate::identity::IdentityClient;
use crate::services::dashboard::DashboardState;
use crate::services::filter::DateFilter;
use crate::services::session::SessionCache;
use crate::store::StoreClient;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: config::AppConfig,
    pub store: StoreClient,
    pub identity: IdentityClient,
    pub sessions: SessionCache,
    pub dashboard: DashboardState,
    pub filter: Arc<RwLock<DateFilter>>,
}

impl AppState {
    /// Build the collaborator clients and fresh component state. The date
    /// filter starts with the default trailing window ending today.
    pub fn new(config: config::AppConfig) -> Self {
        let store = StoreClient::new(&config.store_url(), &config.platform_anon_key);
        let identity = IdentityClient::new(&config.identity_url(), &config.platform_anon_key);
        Self {
            config,
            store,
            identity,
            sessions: SessionCache::new(),
            dashboard: DashboardState::new(),
            filter: Arc::new(RwLock::new(DateFilter::new(Local::now().date_naive()))),
        }
    }

    /// Spawn the background task that keeps the dashboard snapshot in step
    /// with the session cache.
    pub fn spawn_refresher(&self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(
            self.dashboard
                .clone()
                .run_refresher(self.store.clone(), self.sessions.clone()),
        )
    }
}
