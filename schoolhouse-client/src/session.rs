//! Session lifecycle: login establishes it, logout tears it down.

use crate::cache::QueryCache;
use crate::rest::TokenCell;
use schoolhouse_api::types::LoginResponse;
use schoolhouse_core::Session;
use std::sync::{Arc, RwLock};

/// Holds the current session and the bearer token the REST client reads.
/// Cheap to clone; all clones see the same session.
#[derive(Clone)]
pub struct SessionStore {
    session: Arc<RwLock<Session>>,
    token: TokenCell,
    cache: QueryCache,
}

impl SessionStore {
    pub fn new(token: TokenCell, cache: QueryCache) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::anonymous())),
            token,
            cache,
        }
    }

    pub fn current(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install the session from a successful login. The token rotates first
    /// so requests issued by refetches already carry it.
    pub fn establish(&self, login: LoginResponse) {
        self.token.set(Some(login.token));
        let mut slot = self
            .session
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Session::for_user(login.user);
        tracing::info!(email = %slot.user.as_ref().map(|u| u.email.as_str()).unwrap_or(""), "session established");
    }

    /// Drop the session, the token, and every cached server response. No
    /// stale per-user data survives into the next sign-in.
    pub fn logout(&self) {
        {
            let mut slot = self
                .session
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *slot = Session::anonymous();
        }
        self.token.set(None);
        self.cache.clear();
        tracing::info!("session cleared");
    }
}
