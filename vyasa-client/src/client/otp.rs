//! OtpRequested state: verifying the code.

use shared::client::{RequestOtpRequest, RequestOtpResponse, VerifyOtpRequest, VerifyOtpResponse};

use crate::dispatch::ApiRequest;
use crate::error::{ClientError, ClientResult};
use crate::storage::PendingMobile;
use crate::types::{Anonymous, Authenticated, OtpRequested};

use super::VyasaClient;

/// OTP length accepted by the backend
pub const OTP_LENGTH: usize = 6;

const INVALID_LOGIN_RESPONSE: &str = "Invalid response from server. Please try again.";

impl VyasaClient<OtpRequested> {
    /// The number the OTP was sent to.
    pub fn pending_mobile(&self) -> Option<&PendingMobile> {
        self.pending.as_ref()
    }

    /// Verifies the OTP and logs in.
    ///
    /// A wrong code leaves this client usable for another attempt.
    ///
    /// # Errors
    ///
    /// - `ClientError::Validation` unless the code is exactly six digits (no
    ///   request is made)
    /// - `ClientError::InvalidResponse` when the backend answers without a token
    /// - the backend's error otherwise
    pub async fn verify_otp(&self, otp: &str) -> ClientResult<VyasaClient<Authenticated>> {
        let otp = otp.trim();
        if otp.len() != OTP_LENGTH || !otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClientError::Validation(
                "Please enter the 6-digit code".into(),
            ));
        }
        let pending = self.pending_or_err()?;

        let request = VerifyOtpRequest {
            country_code: pending.country_code.clone(),
            mobile_no: pending.mobile_no.clone(),
            otp: otp.to_string(),
            email: String::new(),
        };
        let response: VerifyOtpResponse = self
            .dispatcher
            .send(ApiRequest::post("/auth/login").json(&request).anonymous())
            .await?;

        if response.access_token.trim().is_empty() {
            tracing::error!("Login response carried no access token");
            return Err(ClientError::InvalidResponse(INVALID_LOGIN_RESPONSE.into()));
        }
        if response.needs_registration {
            tracing::info!("Backend reports the account needs registration");
        }

        let client = self.establish(&response.access_token)?;
        let session = self.dispatcher.session();
        session.remove_user_email();
        session.clear_pending_mobile();
        Ok(client)
    }

    /// Sends the OTP again to the same number.
    pub async fn resend_otp(&self) -> ClientResult<()> {
        let pending = self.pending_or_err()?;
        let request = RequestOtpRequest {
            country_code: pending.country_code.clone(),
            mobile_no: pending.mobile_no.clone(),
            email: String::new(),
        };
        let response: RequestOtpResponse = self
            .dispatcher
            .send(ApiRequest::post("/auth/send-otp").json(&request).anonymous())
            .await?;
        tracing::info!(message = %response.message, "OTP re-sent");
        Ok(())
    }

    /// Abandons the OTP flow.
    pub fn cancel(self) -> VyasaClient<Anonymous> {
        self.dispatcher.session().clear_pending_mobile();
        self.into_state(None, None)
    }

    fn pending_or_err(&self) -> ClientResult<&PendingMobile> {
        self.pending.as_ref().ok_or_else(|| {
            ClientError::Validation("Mobile number not found. Please request a new OTP.".into())
        })
    }
}
