//! services/api/src/adapters/identity.rs
//!
//! Session identity kept in a `KeyValueStore` under the same keys the dashboard
//! uses in local storage. Implements the read-only `SessionIdentityProvider`
//! port; the login and logout handlers write through the helpers below.

use async_trait::async_trait;
use course_chat_core::domain::UserProfile;
use course_chat_core::ports::{KeyValueStore, PortError, PortResult, SessionIdentityProvider};
use std::sync::Arc;
use tracing::warn;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
pub const USER_KEY: &str = "user";

#[derive(Clone)]
pub struct KvIdentityAdapter {
    store: Arc<dyn KeyValueStore>,
}

impl KvIdentityAdapter {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl SessionIdentityProvider for KvIdentityAdapter {
    async fn current_user(&self) -> PortResult<Option<UserProfile>> {
        let Some(raw) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!("Stored user profile is not valid JSON, ignoring it: {}", e);
                Ok(None)
            }
        }
    }

    async fn access_token(&self) -> PortResult<Option<String>> {
        self.store.get(ACCESS_TOKEN_KEY).await
    }
}

/// Stores the token and JSON-encoded profile of a successful login.
pub async fn persist_login(
    store: &dyn KeyValueStore,
    access_token: &str,
    user: &UserProfile,
) -> PortResult<()> {
    let user_json =
        serde_json::to_string(user).map_err(|e| PortError::Unexpected(e.to_string()))?;
    store.set(ACCESS_TOKEN_KEY, access_token).await?;
    store.set(USER_KEY, &user_json).await
}

/// Forgets everything about the signed-in user.
pub async fn clear_auth(store: &dyn KeyValueStore) -> PortResult<()> {
    store.remove(ACCESS_TOKEN_KEY).await?;
    store.remove(REFRESH_TOKEN_KEY).await?;
    store.remove(USER_KEY).await
}
