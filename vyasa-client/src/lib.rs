//! Vyasa Client - typed client for the Vyasa school platform
//!
//! Every call goes through one school-scoped [`Dispatcher`]: school data
//! requests fail fast without an active school, carry the bearer token and
//! `X-School-Id`, and a 401 ends the session. [`VyasaClient`] wraps the
//! dispatcher in a typestate login flow and exposes the feature APIs.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod jwt;
pub mod storage;
pub mod tenant;
pub mod transport;
pub mod types;
pub mod upload;

pub use cache::{QueryCache, QueryKey};
pub use client::{ClientBuilder, VyasaClient};
pub use config::ClientConfig;
pub use dispatch::{ApiRequest, Dispatcher, Scope, SessionExpiryHandler};
pub use error::{ClientError, ClientResult};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, SessionStore};
pub use tenant::{SchoolId, TenantContext};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, RequestBody, Transport, TransportError};
pub use types::{Anonymous, Authenticated, ClientState, OtpRequested};
pub use upload::{UploadFile, UploadKind};

// Re-export shared types for convenience
pub use shared::client::CurrentUser;
pub use shared::{BulkUploadResult, CsvTemplate, JwtClaims, Role, RowError};
