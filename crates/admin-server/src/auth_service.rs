/// Auth Gate for the operator account
///
/// There is exactly one admin identity, taken from configuration. A login
/// must match both its username and password; success mints a fresh token
/// that replaces the previous one in the [`CredentialStore`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::config::AdminIdentity;
use crate::credential_store::CredentialStore;
use crate::types::{AdminError, SessionToken};

pub struct AuthService {
    identity: AdminIdentity,
    store: Arc<dyn CredentialStore>,
    session_ttl: Option<Duration>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("username", &self.identity.username)
            .field("session_ttl", &self.session_ttl)
            .finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        identity: AdminIdentity,
        store: Arc<dyn CredentialStore>,
        session_ttl: Option<Duration>,
    ) -> Self {
        Self {
            identity,
            store,
            session_ttl,
        }
    }

    /// Verifies the admin credentials and issues a new session token
    ///
    /// # Errors
    ///
    /// * `AdminError::Unauthorized` - username or password does not match
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionToken, AdminError> {
        // Both comparisons always run so timing does not reveal which field was wrong.
        let user_ok = constant_time_eq(username, &self.identity.username);
        let pass_ok = constant_time_eq(password, &self.identity.password);
        if !(user_ok & pass_ok) {
            return Err(AdminError::Unauthorized);
        }

        let expires_at = match self.session_ttl {
            Some(ttl) => {
                let ttl = chrono::Duration::from_std(ttl)
                    .map_err(|e| AdminError::Config(format!("session ttl out of range: {}", e)))?;
                Some(Utc::now() + ttl)
            }
            None => None,
        };
        let token = SessionToken {
            token: Uuid::new_v4().to_string(),
            expires_at,
        };
        self.store.set(&self.identity.username, token.clone()).await?;
        Ok(token)
    }

    /// Checks `token` against the currently stored session token
    ///
    /// # Errors
    ///
    /// * `AdminError::Unauthorized` - no session, or a different token
    /// * `AdminError::SessionExpired` - the stored session is past its expiry
    pub async fn authorize(&self, token: &str) -> Result<(), AdminError> {
        let Some(stored) = self.store.get(&self.identity.username).await? else {
            return Err(AdminError::Unauthorized);
        };
        if !constant_time_eq(token, &stored.token) {
            return Err(AdminError::Unauthorized);
        }
        if stored.is_expired(Utc::now()) {
            self.store.remove(&self.identity.username).await?;
            return Err(AdminError::SessionExpired);
        }
        Ok(())
    }

    /// Drops the current session
    pub async fn logout(&self) -> Result<(), AdminError> {
        self.store.remove(&self.identity.username).await
    }

    pub fn admin_username(&self) -> &str {
        &self.identity.username
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
