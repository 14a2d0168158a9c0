use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use futures::future::{BoxFuture, FutureExt};
use secrecy::SecretString;
use tracing::debug;

use crate::error::Error;

/// Source of bearer tokens for the clash-detection API.
///
/// Implemented by the host application (viewer sign-in, device-code flow,
/// service principal, ...). Token acquisition may suspend, so the method
/// returns a boxed future to keep the trait object safe.
pub trait TokenProvider: Send + Sync {
    /// Resolve the current access token, including its scheme prefix
    /// (e.g. `"Bearer eyJ..."`). The value is sent verbatim.
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>>;
}

/// A fixed token, typically resolved once from configuration.
#[derive(Clone)]
pub struct StaticToken {
    token: SecretString,
}

impl StaticToken {
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }
}

impl TokenProvider for StaticToken {
    fn access_token(&self) -> BoxFuture<'_, Result<SecretString, Error>> {
        let token = self.token.clone();
        async move { Ok(token) }.boxed()
    }
}

/// Late-bound authorization slot shared between the host and the client.
///
/// The client is usually built before the host has finished signing in, so
/// the provider is installed separately. Requests issued while the slot is
/// empty fail with [`Error::AuthMissing`].
#[derive(Default)]
pub struct Authorization {
    provider: RwLock<Option<Arc<dyn TokenProvider>>>,
}

impl Authorization {
    /// An empty slot -- every request fails until a provider is installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with `provider`.
    pub fn with_provider(provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            provider: RwLock::new(Some(provider)),
        }
    }

    /// Install (or replace) the token provider.
    pub fn install(&self, provider: Arc<dyn TokenProvider>) {
        debug!("installing authorization provider");
        *self.provider.write().unwrap_or_else(PoisonError::into_inner) = Some(provider);
    }

    /// Remove the provider (sign-out).
    pub fn clear(&self) {
        *self.provider.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Whether a provider is currently installed.
    pub fn is_ready(&self) -> bool {
        self.provider.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Resolve a token from the installed provider.
    pub async fn access_token(&self) -> Result<SecretString, Error> {
        let provider = self
            .provider
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(Error::AuthMissing)?;
        provider.access_token().await
    }
}

impl fmt::Debug for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authorization")
            .field("ready", &self.is_ready())
            .finish()
    }
}
