//! Common client definitions and shared functionality.
//!
//! This module defines the core `VyasaClient` struct and the functionality
//! shared by every state.

use std::sync::Arc;

use shared::JwtClaims;

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::dispatch::Dispatcher;
use crate::error::ClientResult;
use crate::jwt::decode_claims;
use crate::storage::{PendingMobile, SessionStore};
use crate::tenant::{SchoolId, TenantContext};
use crate::types::{Anonymous, Authenticated, ClientState, StateMarker};

use super::builder::ClientBuilder;

/// A type-safe client for the Vyasa backend.
///
/// `VyasaClient` uses the typestate pattern to enforce the login flow at
/// compile time:
///
/// - **Anonymous**: no session. `request_otp()`, `login_with_token()`, `resume()`.
/// - **OtpRequested**: an OTP was sent. `verify_otp()`, `resend_otp()`, `cancel()`.
/// - **Authenticated**: logged in. Feature APIs, `me()`, `logout()`.
///
/// Clones share the session, the school context and the request cache.
///
/// # Example
///
/// ```no_run
/// use vyasa_client::{ClientConfig, VyasaClient};
///
/// # async fn example() -> Result<(), vyasa_client::ClientError> {
/// let client = VyasaClient::builder()
///     .config(ClientConfig::from_env()?)
///     .build()?;
///
/// let pending = client.request_otp("+91", "9876543210").await?;
/// let client = pending.verify_otp("123456").await?;
///
/// let holidays = client.holidays().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct VyasaClient<S: ClientState = Anonymous> {
    #[allow(dead_code)] // Used for typestate pattern at compile time
    pub(crate) marker: StateMarker<S>,
    pub(crate) dispatcher: Arc<Dispatcher>,
    pub(crate) config: ClientConfig,
    /// Set in `OtpRequested`
    pub(crate) pending: Option<PendingMobile>,
    /// Set in `Authenticated`
    pub(crate) claims: Option<JwtClaims>,
}

impl<S: ClientState> Clone for VyasaClient<S> {
    fn clone(&self) -> Self {
        Self {
            marker: StateMarker::new(),
            dispatcher: Arc::clone(&self.dispatcher),
            config: self.config.clone(),
            pending: self.pending.clone(),
            claims: self.claims.clone(),
        }
    }
}

// ============================================================================
// Builder Entry Point
// ============================================================================

impl VyasaClient<Anonymous> {
    /// Creates a builder for a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

// ============================================================================
// Common Methods (Available in All States)
// ============================================================================

impl<S: ClientState> VyasaClient<S> {
    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Persisted session scalars
    pub fn session(&self) -> &SessionStore {
        self.dispatcher.session()
    }

    /// Active school register
    pub fn tenant_context(&self) -> &TenantContext {
        self.dispatcher.tenant()
    }

    /// Active school, if any
    pub fn school_id(&self) -> Option<SchoolId> {
        self.dispatcher.tenant().get()
    }

    pub fn cache(&self) -> &QueryCache {
        self.dispatcher.cache()
    }

    /// The request dispatcher, for calls not covered by a feature API
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) fn into_state<T: ClientState>(
        self,
        pending: Option<PendingMobile>,
        claims: Option<JwtClaims>,
    ) -> VyasaClient<T> {
        VyasaClient {
            marker: StateMarker::new(),
            dispatcher: self.dispatcher,
            config: self.config,
            pending,
            claims,
        }
    }

    /// Post-login handling shared by every login path
    ///
    /// The token is only stored once its payload decodes.
    pub(crate) fn establish(&self, token: &str) -> ClientResult<VyasaClient<Authenticated>> {
        let claims = decode_claims(token)?;
        let session = self.dispatcher.session();
        let tenant = self.dispatcher.tenant();

        session.set_token(token);
        match claims.tenant().and_then(SchoolId::new) {
            Some(school_id) => tenant.set(school_id),
            None => tenant.clear(),
        }
        self.dispatcher.cache().clear();

        let role = claims.role();
        if role == shared::Role::Unknown {
            tracing::warn!(role = %claims.role, "Unknown role");
        }
        tracing::info!(
            user = %claims.sub,
            role = %role,
            school = %claims.school_id,
            "Logged in"
        );

        Ok(self.clone().into_state(None, Some(claims)))
    }

    /// Drop session, school context and cached data
    pub(crate) fn teardown(&self) {
        self.dispatcher.session().clear_all();
        self.dispatcher.tenant().clear();
        self.dispatcher.cache().clear();
    }
}
