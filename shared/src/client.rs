//! Auth-related types shared between the backend contract and vyasa-client
//!
//! OTP login DTOs, the decoded access-token payload and role routing.

use serde::{Deserialize, Serialize};
use validator::Validate;
use std::fmt;
use std::str::FromStr;

/// School id carried by platform-level (super-admin) tokens.
///
/// A token with this school id never sets a tenant context.
pub const PLATFORM_SCHOOL_ID: &str = "platform";

// =============================================================================
// Auth API DTOs
// =============================================================================

/// `POST /auth/send-otp` request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpRequest {
    #[validate(custom(function = "crate::models::validate::country_code"))]
    pub country_code: String,
    #[validate(custom(function = "crate::models::validate::mobile_number"))]
    pub mobile_no: String,
    /// Mobile-only OTP: always sent empty
    #[serde(default)]
    pub email: String,
}

/// `POST /auth/send-otp` response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestOtpResponse {
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub mobile_no: Option<String>,
}

/// `POST /auth/login` request (OTP verification)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub country_code: String,
    pub mobile_no: String,
    pub otp: String,
    #[serde(default)]
    pub email: String,
}

/// `POST /auth/login` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub needs_registration: bool,
}

/// `GET /auth/me` response
///
/// The profile shape differs per role, so only the common fields are typed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub school_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// =============================================================================
// Token payload
// =============================================================================

/// Access-token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JwtClaims {
    /// User id
    pub sub: String,
    #[serde(default)]
    pub phone: String,
    pub role: String,
    #[serde(default)]
    pub school_id: String,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub exp: i64,
}

impl JwtClaims {
    /// Parsed role (case-insensitive)
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or(Role::Unknown)
    }

    /// Tenant the token is bound to, `None` for platform tokens
    pub fn tenant(&self) -> Option<&str> {
        if self.school_id.is_empty() || self.school_id == PLATFORM_SCHOOL_ID {
            None
        } else {
            Some(&self.school_id)
        }
    }
}

/// Backend role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    SuperAdmin,
    SchoolAdmin,
    Teacher,
    Parent,
    Unknown,
}

impl Role {
    /// Wire name (`SUPER_ADMIN`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::SchoolAdmin => "SCHOOL_ADMIN",
            Self::Teacher => "TEACHER",
            Self::Parent => "PARENT",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Landing page after login
    pub fn dashboard_path(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "/dashboard/super-admin",
            Self::SchoolAdmin => "/dashboard/admin",
            Self::Teacher => "/dashboard/teacher/attendance",
            Self::Parent => "/dashboard/parent",
            Self::Unknown => "/dashboard",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "SCHOOL_ADMIN" => Ok(Self::SchoolAdmin),
            "TEACHER" => Ok(Self::Teacher),
            "PARENT" => Ok(Self::Parent),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
