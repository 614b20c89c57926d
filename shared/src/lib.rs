//! Shared types for the Vyasa school platform
//!
//! Wire types mirrored from the backend (entities and create/update
//! payloads), the backend error envelope, response envelopes and the CSV
//! templates accepted by the bulk-upload endpoints.

pub mod client;
pub mod error;
pub mod models;
pub mod response;
pub mod templates;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use client::{JwtClaims, Role, PLATFORM_SCHOOL_ID};
pub use error::{BackendError, ErrorCategory};
pub use response::{BulkUploadResult, RowError};
pub use templates::CsvTemplate;
