//! Anonymous state: starting a login.

use shared::client::{RequestOtpRequest, RequestOtpResponse};
use validator::Validate;

use crate::dispatch::ApiRequest;
use crate::error::ClientResult;
use crate::storage::PendingMobile;
use crate::types::{Anonymous, Authenticated, OtpRequested};

use super::VyasaClient;

impl VyasaClient<Anonymous> {
    /// Sends an OTP to a mobile number.
    ///
    /// The number is remembered in the session storage so the flow can be
    /// picked up again with [`pending_otp`](Self::pending_otp).
    ///
    /// # Errors
    ///
    /// `ClientError::Validation` for a malformed number (no request is
    /// made), otherwise the backend's error.
    pub async fn request_otp(
        &self,
        country_code: &str,
        mobile_no: &str,
    ) -> ClientResult<VyasaClient<OtpRequested>> {
        let request = RequestOtpRequest {
            country_code: country_code.trim().to_string(),
            mobile_no: mobile_no.trim().to_string(),
            email: String::new(),
        };
        request.validate()?;

        let response: RequestOtpResponse = self
            .dispatcher
            .send(ApiRequest::post("/auth/send-otp").json(&request).anonymous())
            .await?;
        tracing::info!(message = %response.message, "OTP sent");

        let session = self.dispatcher.session();
        session.remove_user_email();
        session.set_pending_mobile(&request.country_code, &request.mobile_no);

        let pending = PendingMobile {
            country_code: request.country_code,
            mobile_no: request.mobile_no,
        };
        Ok(self.clone().into_state(Some(pending), None))
    }

    /// Picks up an OTP flow started before a restart.
    pub fn pending_otp(&self) -> Option<VyasaClient<OtpRequested>> {
        let pending = self.dispatcher.session().pending_mobile()?;
        Some(self.clone().into_state(Some(pending), None))
    }

    /// Logs in with a token handed over by an external provider (OAuth
    /// redirect).
    ///
    /// # Errors
    ///
    /// `ClientError::Token` when the token payload cannot be decoded; nothing
    /// is stored in that case.
    pub fn login_with_token(&self, token: &str) -> ClientResult<VyasaClient<Authenticated>> {
        self.establish(token.trim())
    }

    /// Re-enters the authenticated state from a stored token.
    ///
    /// A stored token that cannot be decoded is discarded.
    pub fn resume(&self) -> Option<VyasaClient<Authenticated>> {
        let token = self.dispatcher.session().token()?;
        match self.establish(&token) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding stored token");
                self.teardown();
                None
            }
        }
    }
}
