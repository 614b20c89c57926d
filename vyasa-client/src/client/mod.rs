//! Client module - typestate client implementation.
//!
//! This module provides the `VyasaClient` type whose state parameter tracks
//! the login flow.

mod anonymous;
mod authenticated;
mod builder;
mod common;
mod otp;

pub use builder::ClientBuilder;
pub use common::VyasaClient;
