//! Application context
//!
//! Wires configuration, the credential source, durable storage and the
//! session store together. Built once at startup.

use std::sync::Arc;
use std::time::Duration;

use crate::auth::{
    AuthService, FileStorage, InMemoryCredentialStore, KeyValueStorage, MemoryStorage,
    PreferenceStore, SessionStore,
};
use crate::config::Config;
use crate::error::Result;

pub struct App {
    pub config: Config,
    pub session: SessionStore,
    pub preferences: PreferenceStore,
}

impl App {
    /// Context backed by the storage file named in the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(FileStorage::open(&config.storage.path)?);
        Self::with_storage(config, storage)
    }

    /// Context that keeps everything in memory
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::with_storage(config, Arc::new(MemoryStorage::new()))
    }

    pub fn with_storage(config: Config, storage: Arc<dyn KeyValueStorage>) -> Result<Self> {
        let credentials = InMemoryCredentialStore::with_demo_accounts()?
            .with_latency(Duration::from_millis(config.auth.simulated_latency_ms));

        let auth = AuthService::from_config(&config, Arc::new(credentials), storage.clone())?;
        let preferences = PreferenceStore::new(storage, config.storage.preferences_prefix());

        tracing::debug!(
            "Application context ready ({} environment)",
            config.app.environment
        );

        Ok(Self {
            config,
            session: SessionStore::new(auth),
            preferences,
        })
    }
}
