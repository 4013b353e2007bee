//! Shared client context.
//!
//! One `ClientContext` backs the whole UI: every screen shares the same
//! cache, REST client, session, and mutator. Cheap to clone.

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::mutation::Mutator;
use crate::notifications::{Notification, Notifier};
use crate::rest::{RestClient, TokenCell};
use crate::session::SessionStore;
use std::time::Duration;
use tokio::sync::mpsc;

const NOTIFICATION_CAPACITY: usize = 64;

#[derive(Clone)]
pub struct ClientContext {
    pub config: ClientConfig,
    pub rest: RestClient,
    pub cache: QueryCache,
    pub session: SessionStore,
    pub mutator: Mutator,
    pub notifier: Notifier,
}

impl ClientContext {
    /// Build the context from a validated config. Returns the receiver the
    /// UI drains for toast notifications.
    pub fn new(config: ClientConfig) -> Result<(Self, mpsc::Receiver<Notification>), ClientError> {
        let token = TokenCell::new(config.auth.bearer_token.clone());
        let rest = RestClient::new(&config, token.clone())?;
        let cache = QueryCache::new(Duration::from_millis(config.stale_time_ms));
        let (notifier, notifications) = Notifier::channel(NOTIFICATION_CAPACITY);
        let session = SessionStore::new(token, cache.clone());
        let mutator = Mutator::new(cache.clone(), notifier.clone());

        tracing::debug!(base_url = %config.api_base_url, "client context initialized");

        Ok((
            Self {
                config,
                rest,
                cache,
                session,
                mutator,
                notifier,
            },
            notifications,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;

    fn test_config() -> ClientConfig {
        ClientConfig {
            api_base_url: "http://localhost:5000/api/v1".to_string(),
            request_timeout_ms: 5_000,
            stale_time_ms: 30_000,
            default_page_size: 10,
            auth: AuthConfig {
                bearer_token: Some("boot-token".to_string()),
            },
        }
    }

    #[test]
    fn test_context_wires_shared_collaborators() {
        let (ctx, _notifications) = ClientContext::new(test_config()).unwrap();

        // Session starts anonymous even with a pre-provisioned token.
        assert!(!ctx.session.current().authenticated);

        // Clones observe the same session store.
        let clone = ctx.clone();
        assert!(!clone.session.current().authenticated);
    }
}
