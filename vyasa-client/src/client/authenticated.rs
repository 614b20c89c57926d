//! Authenticated state: feature APIs and logout.

use shared::client::CurrentUser;
use shared::{JwtClaims, Role};

use crate::api::{
    AnnouncementsApi, AttendanceApi, ClassesApi, HolidaysApi, SchoolsApi, StudentsApi, TeachersApi,
};
use crate::dispatch::ApiRequest;
use crate::error::{ClientError, ClientResult};
use crate::types::{Anonymous, Authenticated};

use super::VyasaClient;

impl VyasaClient<Authenticated> {
    /// Decoded token payload.
    ///
    /// # Errors
    ///
    /// `ClientError::Token` if the client was put in this state without
    /// claims; the login paths always set them.
    pub fn claims(&self) -> ClientResult<&JwtClaims> {
        self.claims
            .as_ref()
            .ok_or_else(|| ClientError::Token("Invalid token format".into()))
    }

    pub fn role(&self) -> Role {
        self.claims
            .as_ref()
            .map(JwtClaims::role)
            .unwrap_or(Role::Unknown)
    }

    /// Landing page for the logged-in role
    pub fn dashboard_path(&self) -> &'static str {
        self.role().dashboard_path()
    }

    /// Current bearer token, `None` once the session has expired
    pub fn token(&self) -> Option<String> {
        self.dispatcher.session().token()
    }

    /// Whether the backend has since rejected the session
    pub fn is_expired(&self) -> bool {
        self.token().is_none()
    }

    /// Profile of the logged-in user
    pub async fn me(&self) -> ClientResult<CurrentUser> {
        self.dispatcher
            .send(ApiRequest::get("/auth/me").platform())
            .await
    }

    /// Remember this device for the next login
    pub fn remember_device(&self, device_token: &str) {
        let session = self.dispatcher.session();
        session.set_device_token(device_token);
        session.set_remember_device(true);
    }

    /// Forget the remembered device
    pub fn forget_device(&self) {
        let session = self.dispatcher.session();
        session.remove_device_token();
        session.set_remember_device(false);
    }

    /// Ends the session locally.
    ///
    /// Clears the token, the school context and all cached data.
    pub fn logout(self) -> VyasaClient<Anonymous> {
        self.teardown();
        tracing::info!("Logged out");
        self.into_state(None, None)
    }

    // ========== Feature APIs ==========

    pub fn announcements(&self) -> AnnouncementsApi<'_> {
        AnnouncementsApi::new(&self.dispatcher)
    }

    pub fn attendance(&self) -> AttendanceApi<'_> {
        AttendanceApi::new(&self.dispatcher)
    }

    pub fn classes(&self) -> ClassesApi<'_> {
        ClassesApi::new(&self.dispatcher)
    }

    pub fn holidays(&self) -> HolidaysApi<'_> {
        HolidaysApi::new(&self.dispatcher)
    }

    /// Platform-level school administration (super admin)
    pub fn schools(&self) -> SchoolsApi<'_> {
        SchoolsApi::new(&self.dispatcher)
    }

    pub fn students(&self) -> StudentsApi<'_> {
        StudentsApi::new(&self.dispatcher)
    }

    pub fn teachers(&self) -> TeachersApi<'_> {
        TeachersApi::new(&self.dispatcher)
    }
}
