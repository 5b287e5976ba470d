//! Session store: maps opaque cookie-delivered session ids to an
//! authentication flag.
//!
//! Sessions are process-local. A restart (or a second instance) loses every
//! session and forces re-login; that is an accepted limitation, not a bug.
//! The backing is behind a trait so a shared store could be swapped in for
//! multi-instance deployments without touching the handlers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Name of the cookie carrying the session id.
pub const SESSION_COOKIE: &str = "vault_session";

/// Per-session state. Only the authentication flag is tracked.
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    pub is_authenticated: bool,
}

/// Storage backing for session state.
#[async_trait]
pub trait SessionBacking: Send + Sync {
    async fn put(&self, id: String, data: SessionData);
    async fn get(&self, id: &str) -> Option<SessionData>;
    /// Remove a session. Removing an unknown id is not an error.
    async fn remove(&self, id: &str) -> anyhow::Result<()>;
}

/// In-memory backing (session id → state).
#[derive(Default)]
pub struct MemoryBacking {
    sessions: RwLock<HashMap<String, SessionData>>,
}

#[async_trait]
impl SessionBacking for MemoryBacking {
    async fn put(&self, id: String, data: SessionData) {
        self.sessions.write().await.insert(id, data);
    }

    async fn get(&self, id: &str) -> Option<SessionData> {
        self.sessions.read().await.get(id).cloned()
    }

    async fn remove(&self, id: &str) -> anyhow::Result<()> {
        self.sessions.write().await.remove(id);
        Ok(())
    }
}

/// Handle to the session store, shared across request handlers.
#[derive(Clone)]
pub struct SessionStore {
    backing: Arc<dyn SessionBacking>,
}

impl SessionStore {
    /// In-memory store, the default for both production and tests.
    pub fn in_memory() -> Self {
        Self::with_backing(Arc::new(MemoryBacking::default()))
    }

    pub fn with_backing(backing: Arc<dyn SessionBacking>) -> Self {
        Self { backing }
    }

    /// Create a fresh authenticated session and return its id.
    pub async fn create_authenticated(&self) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.backing
            .put(id.clone(), SessionData { is_authenticated: true })
            .await;
        id
    }

    /// Whether the given session id exists and is authenticated.
    pub async fn is_authenticated(&self, id: &str) -> bool {
        self.backing
            .get(id)
            .await
            .map(|data| data.is_authenticated)
            .unwrap_or(false)
    }

    /// Destroy a session. Destroying an unknown id succeeds.
    pub async fn destroy(&self, id: &str) -> anyhow::Result<()> {
        self.backing.remove(id).await
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
