//! Builder pattern for VyasaClient construction.

use std::fmt;
use std::sync::Arc;

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::dispatch::{Dispatcher, SessionExpiryHandler};
use crate::error::ClientResult;
use crate::storage::{FileStorage, MemoryStorage, SessionStorage, SessionStore};
use crate::tenant::TenantContext;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{Anonymous, StateMarker};

use super::VyasaClient;

/// Builder for `VyasaClient`.
///
/// # Example
///
/// ```no_run
/// use vyasa_client::{ClientConfig, VyasaClient};
///
/// let client = VyasaClient::builder()
///     .config(ClientConfig::new("https://api.school.example"))
///     .on_session_expired(|to: &str| eprintln!("session over, go to {to}"))
///     .build()
///     .expect("Failed to build client");
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: Option<ClientConfig>,
    transport: Option<Arc<dyn Transport>>,
    storage: Option<Arc<dyn SessionStorage>>,
    expiry: Option<Arc<dyn SessionExpiryHandler>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .field("custom_storage", &self.storage.is_some())
            .field("expiry_handler", &self.expiry.is_some())
            .finish()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the configuration (defaults to [`ClientConfig::default`]).
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the HTTP transport (defaults to [`ReqwestTransport`]).
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the session medium.
    ///
    /// Defaults to a [`FileStorage`] when the configuration names a session
    /// file, in-memory storage otherwise.
    pub fn storage(mut self, storage: Arc<dyn SessionStorage>) -> Self {
        self.storage = Some(storage);
        self
    }

    /// Called with the login path when the backend rejects the session.
    pub fn on_session_expired(mut self, handler: impl SessionExpiryHandler + 'static) -> Self {
        self.expiry = Some(Arc::new(handler));
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for an invalid configuration or when
    /// the HTTP client cannot be created.
    pub fn build(self) -> ClientResult<VyasaClient<Anonymous>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };

        let storage: Arc<dyn SessionStorage> = match (self.storage, &config.session_file) {
            (Some(storage), _) => storage,
            (None, Some(path)) => Arc::new(FileStorage::new(path)),
            (None, None) => Arc::new(MemoryStorage::new()),
        };

        let session = SessionStore::new(storage);
        let tenant = TenantContext::new(session.clone());
        let cache = QueryCache::new(
            config.cache_stale_after,
            config.read_retries,
            config.retry_base_delay,
        );

        let mut dispatcher = Dispatcher::new(transport, config.api_base(), session, tenant, cache);
        if let Some(handler) = self.expiry {
            dispatcher = dispatcher.with_expiry_handler(handler);
        }

        tracing::debug!(base_url = %config.api_base(), "Client built");

        Ok(VyasaClient {
            marker: StateMarker::new(),
            dispatcher: Arc::new(dispatcher),
            config,
            pending: None,
            claims: None,
        })
    }
}
