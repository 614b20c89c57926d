//! Type markers for VyasaClient's typestate pattern.
//!
//! The login flow is `Anonymous -> OtpRequested -> Authenticated`, back to
//! `Anonymous` on logout or session expiry.

use std::marker::PhantomData;

/// No session.
///
/// Available transitions:
/// - `request_otp()` -> OtpRequested
/// - `login_with_token()` / `resume()` -> Authenticated
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

/// An OTP was sent to a mobile number.
///
/// Available transitions:
/// - `verify_otp()` -> Authenticated
/// - `cancel()` -> Anonymous
#[derive(Debug, Clone, Copy)]
pub struct OtpRequested;

/// Logged in.
///
/// Available operations: feature APIs, `me()`, `logout()`.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated;

/// Sealed trait for client states.
pub trait ClientState: private::Sealed + Send + Sync + 'static {}
impl ClientState for Anonymous {}
impl ClientState for OtpRequested {}
impl ClientState for Authenticated {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Anonymous {}
    impl Sealed for super::OtpRequested {}
    impl Sealed for super::Authenticated {}
}

/// Internal wrapper to hold the phantom state marker.
#[derive(Debug)]
pub(crate) struct StateMarker<S> {
    _state: PhantomData<S>,
}

impl<S> StateMarker<S> {
    pub(crate) fn new() -> Self {
        Self {
            _state: PhantomData,
        }
    }
}

impl<S> Clone for StateMarker<S> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<S> Default for StateMarker<S> {
    fn default() -> Self {
        Self::new()
    }
}
