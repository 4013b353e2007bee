//! Mutation runner: write, invalidate, notify.
//!
//! Mutations never touch entity data in the cache directly; on success they
//! only mark the declared key prefixes stale, and subscribed entries refetch
//! in the background. On failure the cache is left untouched.

use crate::cache::{QueryCache, QueryKey};
use crate::error::ClientError;
use crate::notifications::Notifier;
use schoolhouse_api::MessageResponse;
use std::future::Future;

/// Declared effects of a mutation.
#[derive(Debug, Clone, Default)]
pub struct MutationOptions {
    /// Key prefixes marked stale when the mutation succeeds.
    pub invalidates: Vec<QueryKey>,
    /// Toast text used when the response envelope carries no message.
    pub fallback_message: Option<String>,
}

impl MutationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidates(mut self, prefixes: impl IntoIterator<Item = QueryKey>) -> Self {
        self.invalidates.extend(prefixes);
        self
    }

    pub fn fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = Some(message.into());
        self
    }
}

/// Runs mutations against the REST collaborator and applies their declared
/// cache effects. Cheap to clone.
#[derive(Clone)]
pub struct Mutator {
    cache: QueryCache,
    notifier: Notifier,
}

impl Mutator {
    pub fn new(cache: QueryCache, notifier: Notifier) -> Self {
        Self { cache, notifier }
    }

    /// Run a mutation. On success, invalidate the declared prefixes and
    /// toast the envelope message (or the fallback); on error, toast and
    /// leave the cache in its last-known-good state.
    pub async fn run<Fut>(
        &self,
        mutation: Fut,
        options: MutationOptions,
    ) -> Result<MessageResponse, ClientError>
    where
        Fut: Future<Output = Result<MessageResponse, ClientError>>,
    {
        match mutation.await {
            Ok(response) => {
                for prefix in &options.invalidates {
                    self.cache.invalidate_prefix(prefix);
                }
                let message = if response.message.trim().is_empty() {
                    options
                        .fallback_message
                        .clone()
                        .unwrap_or_else(|| "Saved".to_string())
                } else {
                    response.message.clone()
                };
                self.notifier.success(message);
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(error = %err, "mutation failed");
                self.notifier.error(err.user_message());
                Err(err)
            }
        }
    }
}
