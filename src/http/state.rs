use crate::config::Config;
use crate::session::SessionStore;
use crate::store::FileStore;
use anyhow::Result;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Session id → authentication flag, process-local.
    pub sessions: SessionStore,
    /// The upload directory, the system's only durable state.
    pub store: FileStore,
}

impl AppState {
    /// Build state from configuration, creating the upload directory if it
    /// does not exist yet.
    pub fn new(config: Config) -> Result<Self> {
        let store = FileStore::new(&config.storage.upload_dir);
        store.ensure_root()?;

        Ok(Self {
            config: Arc::new(config),
            sessions: SessionStore::in_memory(),
            store,
        })
    }
}
