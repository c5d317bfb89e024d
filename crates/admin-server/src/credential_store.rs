/// Credential Store for operator session tokens
///
/// Holds at most one session token per admin username. Storing a token for
/// a username replaces whatever was there, so a new login always supersedes
/// the previous session.
///
/// **Key Features:**
/// - Thread-safe in-memory storage behind an async `RwLock`
/// - `CredentialStore` trait seam for external key-value stores
/// - Expiry is checked by the auth gate, not here

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::types::{AdminError, SessionToken};

/// Key-value store of session tokens keyed by admin username
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the token currently stored for `username`, if any
    async fn get(&self, username: &str) -> Result<Option<SessionToken>, AdminError>;

    /// Stores `token` for `username`, overwriting any previous token
    async fn set(&self, username: &str, token: SessionToken) -> Result<(), AdminError>;

    /// Removes the token stored for `username`. Idempotent.
    async fn remove(&self, username: &str) -> Result<(), AdminError>;
}

/// In-memory credential store
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryCredentialStore::new();
/// store.set("admin", token).await?;
/// let current = store.get("admin").await?;
/// ```
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    /// Key: admin username, Value: current session token
    tokens: Arc<RwLock<HashMap<String, SessionToken>>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self, username: &str) -> Result<Option<SessionToken>, AdminError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.get(username).cloned())
    }

    async fn set(&self, username: &str, token: SessionToken) -> Result<(), AdminError> {
        let mut tokens = self.tokens.write().await;
        tokens.insert(username.to_string(), token);
        Ok(())
    }

    async fn remove(&self, username: &str) -> Result<(), AdminError> {
        let mut tokens = self.tokens.write().await;
        tokens.remove(username);
        Ok(())
    }
}
