//! Authentication session.
//!
//! [`AuthSession`] is the only owner of the bearer token. The gateway reads it for every request
//! and calls [`AuthSession::on_unauthorized`] when the server answers 401.

mod navigation;
mod store;

use std::sync::Arc;

use agora_types::AccessToken;
use parking_lot::RwLock;
use tracing::{debug, info, warn};

pub use navigation::{NavigationPort, Screen, ScreenTracker};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError, SESSION_FILE};

pub struct AuthSession {
    token: RwLock<Option<AccessToken>>,
    store: Arc<dyn SessionStore>,
    navigation: Arc<dyn NavigationPort>,
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    /// Restore the persisted token, if any.
    ///
    /// An unreadable store is cleared so the next login starts from a clean slate.
    pub fn init(store: Arc<dyn SessionStore>, navigation: Arc<dyn NavigationPort>) -> Self {
        let token = match store.get() {
            Ok(token) => token,
            Err(e) => {
                warn!("Discarding unreadable session: {}", e);
                if let Err(e) = store.clear() {
                    warn!("Failed to clear session store: {}", e);
                }
                None
            }
        };
        if token.is_some() {
            info!("Restored saved session");
        }
        Self { token: RwLock::new(token), store, navigation }
    }

    pub fn set_token(&self, token: AccessToken) {
        if let Err(e) = self.store.set(&token) {
            warn!("Failed to persist session token: {}", e);
        }
        *self.token.write() = Some(token);
        info!("Session started");
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.token.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// Drop the token from memory and from the store.
    ///
    /// Returns whether a token was present. Clearing an empty session touches nothing.
    pub fn clear(&self) -> bool {
        let previous = self.token.write().take();
        if previous.is_none() {
            return false;
        }
        if let Err(e) = self.store.clear() {
            warn!("Failed to clear session store: {}", e);
        }
        debug!("Session token cleared");
        true
    }

    /// Session teardown after a 401.
    ///
    /// Concurrent 401s race on the token; only the first one to take it clears the store.
    pub fn on_unauthorized(&self) {
        if self.clear() {
            warn!("Session expired, returning to entry screen");
        }
        self.return_to_entry();
    }

    /// User-initiated teardown.
    pub fn logout(&self) {
        self.clear();
        info!("Logged out");
        self.return_to_entry();
    }

    fn return_to_entry(&self) {
        if !self.navigation.is_at_entry() {
            self.navigation.go_to_entry();
        }
    }
}
